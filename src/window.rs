//! SDL2 windows with named OpenGL contexts.

use std::{
    cell::{Ref, RefCell},
    rc::Rc,
};

use log::debug;
use sdl2::{
    sys,
    video::{FullscreenType, GLContext},
};
use serde::{Deserialize, Serialize};

use crate::{
    Platform,
    callbacks::{LoopWindow, WindowCallbacks},
    context::{ContextSettings, ContextTable},
    error::{ContextStep, Error, Result},
    event::WindowId,
};

/// Fullscreen mode of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fullscreen {
    #[default]
    Windowed,
    Fullscreen,
    FullscreenDesktop,
}

impl From<FullscreenType> for Fullscreen {
    fn from(value: FullscreenType) -> Self {
        match value {
            FullscreenType::Off => Fullscreen::Windowed,
            FullscreenType::True => Fullscreen::Fullscreen,
            FullscreenType::Desktop => Fullscreen::FullscreenDesktop,
        }
    }
}

impl From<Fullscreen> for FullscreenType {
    fn from(value: Fullscreen) -> Self {
        match value {
            Fullscreen::Windowed => FullscreenType::Off,
            Fullscreen::Fullscreen => FullscreenType::True,
            Fullscreen::FullscreenDesktop => FullscreenType::Desktop,
        }
    }
}

/// Parameters of a new window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: Fullscreen,
    pub resizable: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: String::new(),
            width: 1024,
            height: 768,
            fullscreen: Fullscreen::Windowed,
            resizable: true,
        }
    }
}

/// An OpenGL capable SDL2 window.
///
/// Windows are shared as `Rc<Window>` between a [`MainLoop`](crate::MainLoop)
/// and user code, so every method takes `&self`.
pub struct Window {
    // Declared before `window` so contexts are released before the window handle.
    contexts: ContextTable<GLContext>,
    callbacks: WindowCallbacks,
    id: WindowId,
    window: RefCell<sdl2::video::Window>,
}

impl Window {
    /// Creates a new window, centered on screen.
    pub fn new(platform: &Platform, settings: &WindowSettings) -> Result<Self> {
        let mut builder = platform
            .video()
            .window(&settings.title, settings.width, settings.height);
        builder.opengl().position_centered();
        if settings.resizable {
            builder.resizable();
        }
        let mut window = builder.build().map_err(|e| Error::Window(e.to_string()))?;
        if settings.fullscreen != Fullscreen::Windowed {
            window
                .set_fullscreen(settings.fullscreen.into())
                .map_err(|e| Error::method("set_fullscreen", e))?;
        }

        let id = window.id();
        debug!(
            "created window {id} \"{}\" ({}x{})",
            settings.title, settings.width, settings.height
        );
        Ok(Self {
            contexts: ContextTable::new(),
            callbacks: WindowCallbacks::new(id),
            id,
            window: RefCell::new(window),
        })
    }

    /// Creates an OpenGL context and stores it under `name`.
    ///
    /// A context previously stored under `name` is released once no window uses it.
    pub fn create_context(&self, name: &str, settings: &ContextSettings) -> Result<()> {
        set_gl_attribute(
            sys::SDL_GLattr::SDL_GL_CONTEXT_MAJOR_VERSION,
            settings.major() as i32,
            ContextStep::MajorVersion,
        )?;
        set_gl_attribute(
            sys::SDL_GLattr::SDL_GL_CONTEXT_MINOR_VERSION,
            settings.minor() as i32,
            ContextStep::MinorVersion,
        )?;
        set_gl_attribute(
            sys::SDL_GLattr::SDL_GL_CONTEXT_PROFILE_MASK,
            settings.profile.mask(),
            ContextStep::Profile,
        )?;
        set_gl_attribute(
            sys::SDL_GLattr::SDL_GL_CONTEXT_FLAGS,
            settings.flags.bits() as i32,
            ContextStep::Flags,
        )?;

        let context = self
            .window
            .borrow()
            .gl_create_context()
            .map_err(|message| Error::CreateContext {
                step: ContextStep::Create,
                message,
            })?;
        self.contexts.insert(name, context);
        debug!(
            "created {:?} {}.{} context \"{name}\" for window {}",
            settings.profile,
            settings.major(),
            settings.minor(),
            self.id
        );
        Ok(())
    }

    /// Stores `other`'s context `other_name` under `name` in this window.
    pub fn share_context(&self, name: &str, other: &Window, other_name: &str) {
        self.contexts.share_from(name, &other.contexts, other_name);
        debug!(
            "window {} shares context \"{other_name}\" of window {} as \"{name}\"",
            self.id, other.id
        );
    }

    /// Makes the context `name` current on this window.
    pub fn make_current(&self, name: &str) -> Result<()> {
        let context = self
            .contexts
            .get(name)
            .unwrap_or_else(|| panic!("window {} has no context named \"{name}\"", self.id));
        self.window
            .borrow()
            .gl_make_current(&context)
            .map_err(|e| Error::method("make_current", e))
    }

    /// Swaps the front and back buffers.
    pub fn swap(&self) {
        self.window.borrow().gl_swap_window();
    }

    pub fn context(&self, name: &str) -> Option<Rc<GLContext>> {
        self.contexts.get(name)
    }

    pub fn has_context(&self, name: &str) -> bool {
        self.contexts.contains(name)
    }

    pub fn context_names(&self) -> Vec<String> {
        self.contexts.names()
    }

    pub fn size(&self) -> (u32, u32) {
        self.window.borrow().size()
    }

    pub fn width(&self) -> u32 {
        self.size().0
    }

    pub fn height(&self) -> u32 {
        self.size().1
    }

    pub fn set_size(&self, width: u32, height: u32) -> Result<()> {
        self.window
            .borrow_mut()
            .set_size(width, height)
            .map_err(|e| Error::method("set_size", e.to_string()))
    }

    pub fn set_title(&self, title: &str) -> Result<()> {
        self.window
            .borrow_mut()
            .set_title(title)
            .map_err(|e| Error::method("set_title", e.to_string()))
    }

    pub fn fullscreen(&self) -> Fullscreen {
        self.window.borrow().fullscreen_state().into()
    }

    pub fn set_fullscreen(&self, fullscreen: Fullscreen) -> Result<()> {
        self.window
            .borrow_mut()
            .set_fullscreen(fullscreen.into())
            .map_err(|e| Error::method("set_fullscreen", e))
    }

    /// The underlying SDL window.
    pub fn sdl_window(&self) -> Ref<'_, sdl2::video::Window> {
        self.window.borrow()
    }
}

impl LoopWindow for Window {
    fn id(&self) -> WindowId {
        self.id
    }

    fn callbacks(&self) -> &WindowCallbacks {
        &self.callbacks
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        self.contexts.clear();
        debug!("destroyed window {}", self.id);
    }
}

fn set_gl_attribute(attr: sys::SDL_GLattr, value: i32, step: ContextStep) -> Result<()> {
    if unsafe { sys::SDL_GL_SetAttribute(attr, value) } == 0 {
        return Ok(());
    }
    Err(Error::CreateContext {
        step,
        message: sdl2::get_error(),
    })
}
