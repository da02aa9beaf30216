//! Logger setup.

use log::LevelFilter;

use crate::error::Result;

/// Installs a logger writing `[time level target] message` lines to stderr.
pub fn init(level: LevelFilter) -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_level_reaches_every_module() {
        init(LevelFilter::Trace).unwrap();
        assert!(log::log_enabled!(target: "sdlwin::main_loop", log::Level::Trace));
        assert!(log::log_enabled!(target: "sdlwin::window", log::Level::Trace));
    }
}
