// Logger setup. The TUI owns the terminal, so it logs to a file; one-shot
// commands log warnings to stderr.
use crate::context::AppContext;
use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode, WriteLogger};
use std::fs::OpenOptions;

fn logger_config() -> simplelog::Config {
    ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build()
}

/// Appends to `<cache dir>/stellar.log`.
pub fn init_file_logger(ctx: &dyn AppContext, level: LevelFilter) -> Result<()> {
    let path = ctx.get_log_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    WriteLogger::init(level, logger_config(), file).context("Logger already initialized")
}

pub fn init_term_logger(level: LevelFilter) -> Result<()> {
    TermLogger::init(
        level,
        logger_config(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Logger already initialized")
}
