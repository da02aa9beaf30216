//! SDL2 initialization.
//!
//! This module defines the [`Platform`] struct which owns the SDL2 context and
//! video subsystem every window and main loop is created from.

use std::sync::Arc;

use log::debug;

use crate::error::{Error, Result};

/// The [`Platform`] struct encapsulates the SDL2 context and video subsystem.
///
/// SDL is shut down once the platform and everything created from it are dropped.
pub struct Platform {
    sdl: sdl2::Sdl,
    video: sdl2::VideoSubsystem,
}

impl Platform {
    /// Initializes SDL2 and its video subsystem.
    pub fn init() -> Result<Self> {
        let sdl = sdl2::init().map_err(Error::Init)?;
        let video = sdl.video().map_err(Error::Init)?;
        debug!("initialized SDL video driver {:?}", video.current_video_driver());
        Ok(Self { sdl, video })
    }

    pub fn sdl(&self) -> &sdl2::Sdl {
        &self.sdl
    }

    pub fn video(&self) -> &sdl2::VideoSubsystem {
        &self.video
    }

    /// Takes the SDL event pump. Only one can exist at a time.
    pub fn event_pump(&self) -> Result<sdl2::EventPump> {
        self.sdl.event_pump().map_err(Error::MainLoop)
    }

    /// Loads OpenGL function pointers for the current context.
    pub fn load_gl(&self) -> Arc<glow::Context> {
        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                self.video.gl_get_proc_address(s) as *const _
            })
        };
        Arc::new(gl)
    }
}
