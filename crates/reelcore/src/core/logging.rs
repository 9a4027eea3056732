//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - A startup summary of the effective configuration

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// Both outputs use the level from `LOG_LEVEL` (default info).
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the file or a logger is already set
pub fn init_logger(log_file_path: &str) -> Result<()> {
    init_logger_with_level(log_file_path, *config::LOG_LEVEL)
}

/// Same as [`init_logger`] with an explicit level.
pub fn init_logger_with_level(log_file_path: &str, level: LevelFilter) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(level, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective configuration at application startup
pub fn log_startup_configuration() {
    log::info!("reelgrab v{}", env!("CARGO_PKG_VERSION"));
    log::info!("  port:        {}", *config::PORT);
    log::info!("  snapsave:    {}", config::SNAPSAVE_BASE_URL.as_str());
    log::info!("  instagram:   {}", config::INSTAGRAM_BASE_URL.as_str());
    log::info!("  log level:   {}", *config::LOG_LEVEL);

    match config::proxy::active() {
        Some(proxy) => log::info!("  proxy:       {}", proxy),
        None => {
            if config::proxy::HTTP_PROXY_URL.is_some() {
                log::info!("  proxy:       disabled");
            } else {
                log::info!("  proxy:       not set");
            }
        }
    }
}
