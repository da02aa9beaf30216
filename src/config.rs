//! JSON configuration describing a main loop and its windows.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    rc::Rc,
};

use log::{LevelFilter, debug};
use serde::{Deserialize, Serialize};

use crate::{
    MainLoop, Platform, Window,
    context::ContextSettings,
    error::{Error, Result},
    main_loop::PollMode,
    window::WindowSettings,
};

/// A context created on a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedContext {
    #[serde(default = "default_context_name")]
    pub name: String,
    #[serde(flatten)]
    pub settings: ContextSettings,
}

fn default_context_name() -> String {
    "context".to_string()
}

impl Default for NamedContext {
    fn default() -> Self {
        Self {
            name: default_context_name(),
            settings: ContextSettings::default(),
        }
    }
}

/// A context borrowed from another window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedContext {
    /// Name of the context on this window.
    pub name: String,
    /// Window to borrow from.
    pub window: String,
    /// Name of the context on that window.
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub name: String,
    #[serde(flatten)]
    pub settings: WindowSettings,
    pub contexts: Vec<NamedContext>,
    pub shared_contexts: Vec<SharedContext>,
    pub clear_color: [f32; 4],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            name: "main".to_string(),
            settings: WindowSettings::default(),
            contexts: vec![NamedContext::default()],
            shared_contexts: Vec::new(),
            clear_color: [0.1, 0.1, 0.2, 1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mode: PollMode,
    pub log_level: LevelFilter,
    pub windows: Vec<WindowConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: PollMode::Poll,
            log_level: LevelFilter::Info,
            windows: vec![WindowConfig::default()],
        }
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// `<config dir>/sdlwin/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sdlwin").join("config.json"))
    }

    /// Reads and validates a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = contents.parse::<Config>()?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Checks window names are unique and shared contexts refer to contexts
    /// that are created.
    pub fn validate(&self) -> Result<()> {
        let mut names = BTreeSet::new();
        for window in &self.windows {
            if !names.insert(window.name.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate window name \"{}\"",
                    window.name
                )));
            }
        }
        for window in &self.windows {
            for shared in &window.shared_contexts {
                let source = self
                    .windows
                    .iter()
                    .find(|w| w.name == shared.window)
                    .ok_or_else(|| {
                        Error::Config(format!(
                            "window \"{}\" shares a context of unknown window \"{}\"",
                            window.name, shared.window
                        ))
                    })?;
                if !source.contexts.iter().any(|c| c.name == shared.context) {
                    return Err(Error::Config(format!(
                        "window \"{}\" has no context \"{}\" to share",
                        shared.window, shared.context
                    )));
                }
            }
        }
        Ok(())
    }

    /// Creates the configured windows and contexts and registers them with a new main loop.
    pub fn build(&self, platform: &Platform) -> Result<MainLoop> {
        self.validate()?;
        let mut main_loop = MainLoop::new(platform, self.mode)?;
        for window_config in &self.windows {
            let window = Window::new(platform, &window_config.settings)?;
            for context in &window_config.contexts {
                window.create_context(&context.name, &context.settings)?;
            }
            main_loop.add_window(window_config.name.clone(), Rc::new(window));
        }
        for window_config in &self.windows {
            for shared in &window_config.shared_contexts {
                let target = main_loop.window(&window_config.name);
                let source = main_loop.window(&shared.window);
                target.share_context(&shared.name, source, &shared.context);
            }
        }
        Ok(main_loop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        context::{ContextFlags, Profile},
        window::Fullscreen,
    };

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = "{}".parse().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.windows[0].name, "main");
        assert_eq!(config.windows[0].contexts[0].settings.version, 450);
    }

    #[test]
    fn test_full_config() {
        let config: Config = r#"{
            "mode": "wait",
            "log_level": "debug",
            "windows": [
                {
                    "name": "left",
                    "title": "Left",
                    "width": 640,
                    "height": 480,
                    "contexts": [
                        { "name": "gl", "version": 330, "profile": "es", "flags": "DEBUG" }
                    ]
                },
                {
                    "name": "right",
                    "fullscreen": "fullscreen",
                    "contexts": [],
                    "shared_contexts": [ { "name": "gl", "window": "left", "context": "gl" } ],
                    "clear_color": [1.0, 0.0, 0.0, 1.0]
                }
            ]
        }"#
        .parse()
        .unwrap();

        assert_eq!(config.mode, PollMode::Wait);
        assert_eq!(config.log_level, LevelFilter::Debug);
        let left = &config.windows[0];
        assert_eq!(left.settings.title, "Left");
        assert_eq!((left.settings.width, left.settings.height), (640, 480));
        assert_eq!(
            left.contexts[0].settings,
            ContextSettings::new(330, Profile::Es, ContextFlags::DEBUG)
        );
        let right = &config.windows[1];
        assert_eq!(right.settings.fullscreen, Fullscreen::Fullscreen);
        assert_eq!(right.settings.width, 1024);
        assert_eq!(right.shared_contexts[0].window, "left");
        assert_eq!(right.clear_color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_duplicate_window_names_rejected() {
        let err = r#"{ "windows": [ { "name": "a" }, { "name": "a" } ] }"#
            .parse::<Config>()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unknown_shared_context_rejected() {
        let err = r#"{ "windows": [
            { "name": "a" },
            { "name": "b", "shared_contexts": [ { "name": "x", "window": "a", "context": "missing" } ] }
        ] }"#
            .parse::<Config>()
            .unwrap_err();
        assert!(err.to_string().contains("missing"));

        let err = r#"{ "windows": [
            { "name": "b", "shared_contexts": [ { "name": "x", "window": "nowhere", "context": "context" } ] }
        ] }"#
            .parse::<Config>()
            .unwrap_err();
        assert!(err.to_string().contains("nowhere"));
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let err = "{ mode: }".parse::<Config>().unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/sdlwin/config.json")).unwrap_err();
        assert!(matches!(err, Error::ConfigIo(_)));
    }

    #[test]
    fn test_default_path_file_name() {
        if let Some(path) = Config::default_path() {
            assert!(path.ends_with("sdlwin/config.json"));
        }
    }
}
