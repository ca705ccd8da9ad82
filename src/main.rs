mod annotations;
mod capture;
mod config;
mod core;
mod domain;
mod error;
mod export;
mod hotkey;
mod render;
mod session;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = config::SnipConfig::load();
    // Registered on the event-loop thread before it starts
    let hotkey = hotkey::register(&config.hotkey)?;
    core::app::run(config, hotkey)
}
