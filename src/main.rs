mod api;
mod app;
mod application;
mod domain;
mod ui;
mod utils;

use std::path::PathBuf;

use api::LoaderConfig;
use iced::window;

fn main() -> iced::Result {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Optional JSON config as the only argument; defaults otherwise
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => LoaderConfig::load(&path),
        None => Ok(LoaderConfig::default()),
    };

    iced::application(
        move || app::LoadingApp::new(config.clone()),
        app::update,
        app::view,
    )
    .title("Loading")
    .window(window::Settings {
        size: iced::Size::new(480.0, 220.0),
        ..Default::default()
    })
    .run()
}
