//! shcube terminal demo - smooth-shaded spinning cube
//!
//! Usage: shcube-terminal [--config path/to/shcube.toml]
//!
//! Without `--config`, `shcube.toml` in the working directory is used when it
//! exists. Logs go to the configured log file; `SHCUBE_LOG` sets the level.
//!   - Q/ESC: Quit

use anyhow::{bail, Context};
use shcube_core::SceneConfig;
use shcube_terminal::TerminalApp;
use std::env;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = "shcube.toml";

fn config_path() -> anyhow::Result<Option<PathBuf>> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("--config") => match args.get(2) {
            Some(path) => Ok(Some(PathBuf::from(path))),
            None => bail!("usage: {} [--config <path>]", args[0]),
        },
        Some(other) => bail!("unexpected argument {other:?}; usage: {} [--config <path>]", args[0]),
        None if Path::new(DEFAULT_CONFIG).exists() => Ok(Some(PathBuf::from(DEFAULT_CONFIG))),
        None => Ok(None),
    }
}

fn init_logging(path: &str) -> anyhow::Result<()> {
    let level = env::var("SHCUBE_LOG")
        .ok()
        .and_then(|value| value.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info);

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
        })
        .level(level)
        .chain(fern::log_file(path).with_context(|| format!("failed to open log file {path}"))?)
        .apply()?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = match config_path()? {
        Some(path) => SceneConfig::load(&path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => SceneConfig::default(),
    };

    init_logging(&config.terminal.log_file)?;
    log::info!("starting with {:?}", config.animation);

    let mut app = TerminalApp::new(&config).context("failed to query terminal size")?;
    app.run().context("terminal render loop failed")?;

    Ok(())
}
