//! SDL2 windows and an event main loop.
//!
//! A [`MainLoop`] owns named [`Window`]s and dispatches every SDL event to, in
//! order, a global event handler, the loop's per-type callbacks, and the
//! destination window's per-type and window-event callbacks. Windows own named
//! OpenGL contexts which can be shared between windows.
//!
//! ```no_run
//! use std::rc::Rc;
//!
//! use sdlwin::{
//!     ContextSettings, EventKind, LoopWindow, MainLoop, Platform, PollMode, Window,
//!     WindowSettings,
//! };
//!
//! fn main() -> sdlwin::Result<()> {
//!     let platform = Platform::init()?;
//!     let mut main_loop = MainLoop::new(&platform, PollMode::Wait)?;
//!     let window = Rc::new(Window::new(&platform, &WindowSettings::default())?);
//!     window.create_context("context", &ContextSettings::default())?;
//!     window.set_event_callback(EventKind::KeyDown, |event, _| {
//!         println!("{event:?}");
//!         true
//!     });
//!     main_loop.add_window("main", window);
//!     main_loop.run()
//! }
//! ```

pub mod callbacks;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod logging;
pub mod main_loop;
pub mod platform;
pub mod window;

pub use callbacks::*;
pub use config::*;
pub use context::*;
pub use error::*;
pub use event::*;
pub use main_loop::*;
pub use platform::*;
pub use window::*;
