mod cli;
mod display;
mod error;

use std::path::{Path, PathBuf};

use clap::Parser;
use cli::{Cli, RunCommand};
use csvw::config::Config;
use error::{CsvwCliError, CsvwCliResult};
use log::debug;

const DEFAULT_LOGGING_LEVEL: &str = "warn";

#[tokio::main]
async fn main() -> CsvwCliResult<()> {
    // Set RUST_LOG to `DEFAULT_LOGGING_LEVEL` if not set
    let _ =
        std::env::var("RUST_LOG").map_err(|_| std::env::set_var("RUST_LOG", DEFAULT_LOGGING_LEVEL));
    pretty_env_logger::init_timed();
    let mut args = Cli::parse();
    debug!("args: {args:?}");
    let config = args.apply_overrides(read_config(args.config.as_deref())?);
    debug!("config: {config:?}");

    // Return ok if pipe is closed instead of error, otherwise return error
    // See: https://stackoverflow.com/a/65760807, https://github.com/rust-lang/rust/issues/62569
    if let Err(err) = args.take_command().run(config).await {
        if let CsvwCliError::IOError(err) = &err {
            if err.kind() == std::io::ErrorKind::BrokenPipe {
                return Ok(());
            }
        }
        Err(err)?;
    }
    Ok(())
}

fn default_config_path() -> Option<PathBuf> {
    // macOS: ~/Library/Application Support/csvw/config.toml
    dirs::config_dir().map(|dir| dir.join("csvw").join("config.toml"))
}

/// Reads the config from `path`, or from the default location when no path
/// is given. A missing default config file yields `Config::default()`.
fn read_config(path: Option<&Path>) -> CsvwCliResult<Config> {
    if let Some(path) = path {
        return read_config_from_toml(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => read_config_from_toml(&path),
        _ => Ok(Config::default()),
    }
}

fn read_config_from_toml(path: &Path) -> CsvwCliResult<Config> {
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}
