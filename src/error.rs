//! Error types.
//!
//! Recoverable failures (SDL initialization, context creation, window methods,
//! configuration) are reported through [`Error`]. Contract violations such as
//! asking for a window or context name that was never registered panic instead.

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// The step of [`Window::create_context`](crate::Window::create_context) that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextStep {
    MajorVersion,
    MinorVersion,
    Profile,
    Flags,
    Create,
}

impl fmt::Display for ContextStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContextStep::MajorVersion => "SDL_GL_CONTEXT_MAJOR_VERSION",
            ContextStep::MinorVersion => "SDL_GL_CONTEXT_MINOR_VERSION",
            ContextStep::Profile => "SDL_GL_CONTEXT_PROFILE_MASK",
            ContextStep::Flags => "SDL_GL_CONTEXT_FLAGS",
            ContextStep::Create => "SDL_GL_CreateContext",
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("sdlwin - {0}")]
    Init(String),

    #[error("sdlwin::MainLoop - {0}")]
    MainLoop(String),

    #[error("sdlwin::Window - {0}")]
    Window(String),

    #[error("sdlwin::Window::{method}() - {message}")]
    WindowMethod {
        method: &'static str,
        message: String,
    },

    #[error("sdlwin::Window::create_context() - {step} - {message}")]
    CreateContext { step: ContextStep, message: String },

    #[error("sdlwin::Config - {0}")]
    Config(String),

    #[error("sdlwin::Config - {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("sdlwin::Config - {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("sdlwin::logging - {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl Error {
    /// Builds a [`Error::WindowMethod`] for the given method.
    pub(crate) fn method(method: &'static str, message: impl Into<String>) -> Self {
        Error::WindowMethod {
            method,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failing_method() {
        let err = Error::method("make_current", "no current context");
        assert_eq!(
            err.to_string(),
            "sdlwin::Window::make_current() - no current context"
        );

        let err = Error::CreateContext {
            step: ContextStep::Profile,
            message: "bad value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "sdlwin::Window::create_context() - SDL_GL_CONTEXT_PROFILE_MASK - bad value"
        );
    }
}
