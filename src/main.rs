use std::{path::PathBuf, process::ExitCode, rc::Rc};

use glow::HasContext;
use log::{error, info, warn};
use sdlwin::{Config, EventKind, LoopWindow, Platform, Window, WindowEventKind};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> sdlwin::Result<()> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(Config::default_path);
    let config = match &path {
        Some(path) if path.exists() => Config::load(path)?,
        _ => Config::default(),
    };
    sdlwin::logging::init(config.log_level)?;
    if let Some(path) = path.filter(|path| !path.exists()) {
        info!("no config at {}, using defaults", path.display());
    }

    let platform = Platform::init()?;
    let mut main_loop = config.build(&platform)?;
    let gl = platform.load_gl();

    // The first context of each window is the one cleared every frame.
    let mut targets = Vec::new();
    for window_config in &config.windows {
        let window = main_loop.window(&window_config.name);
        let Some(context) = window.context_names().into_iter().next() else {
            warn!("window \"{}\" has no context and will not be drawn", window_config.name);
            continue;
        };
        window.set_window_event_callback(WindowEventKind::Resized, |event, _| {
            info!("{event:?}");
            true
        });
        targets.push((Rc::downgrade(window), context, window_config.clear_color));
    }

    main_loop.set_event_callback(EventKind::Quit, |_, main_loop| {
        main_loop.stop();
        true
    });
    main_loop.set_idle_callback(move |_| {
        for (window, context, color) in &targets {
            // closed windows are gone from the loop
            let Some(window) = window.upgrade() else {
                continue;
            };
            draw(&gl, &window, context, *color);
        }
    });

    main_loop.run()
}

fn draw(gl: &glow::Context, window: &Window, context: &str, color: [f32; 4]) {
    if let Err(err) = window.make_current(context) {
        warn!("{err}");
        return;
    }
    let (width, height) = window.size();
    unsafe {
        gl.viewport(0, 0, width as i32, height as i32);
        gl.clear_color(color[0], color[1], color[2], color[3]);
        gl.clear(glow::COLOR_BUFFER_BIT);
    }
    window.swap();
}
