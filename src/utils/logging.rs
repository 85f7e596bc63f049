//! Logging Module
//!
//! Structured logging setup on top of the `tracing` crate, plus a small
//! progress logger for long file-processing loops.

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level to display
    pub level: Level,
    /// Whether to include the module path of the event
    pub include_target: bool,
    /// Whether to use ANSI colors
    pub ansi_colors: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            include_target: false,
            ansi_colors: true,
        }
    }
}

impl LogConfig {
    /// Verbose configuration for debugging
    pub fn verbose() -> Self {
        Self {
            level: Level::DEBUG,
            include_target: true,
            ansi_colors: true,
        }
    }

    /// Quiet configuration (errors only)
    pub fn quiet() -> Self {
        Self {
            level: Level::ERROR,
            include_target: false,
            ansi_colors: true,
        }
    }
}

/// Initialize global logging with the given configuration.
///
/// Returns an error message if a global subscriber was already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), String> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.level)
        .with_ansi(config.ansi_colors)
        .with_target(config.include_target)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| format!("Failed to initialize logging: {}", e))
}

/// Progress logger for long-running file loops.
///
/// Logs every `log_interval` items (a tenth of the total by default) so a
/// large subject directory doesn't flood the output.
pub struct ProgressLogger {
    operation: String,
    total: usize,
    current: usize,
    log_interval: usize,
    start_time: std::time::Instant,
}

impl ProgressLogger {
    /// Create a new progress logger for `total` items.
    pub fn new(operation: &str, total: usize) -> Self {
        Self {
            operation: operation.to_string(),
            total,
            current: 0,
            log_interval: (total / 10).max(1),
            start_time: std::time::Instant::now(),
        }
    }

    /// Increment progress by one item.
    pub fn increment(&mut self) {
        self.current += 1;

        if self.current % self.log_interval == 0 || self.current == self.total {
            let percentage = 100.0 * self.current as f64 / self.total as f64;
            tracing::info!(
                "{}: {}/{} ({:.1}%)",
                self.operation,
                self.current,
                self.total,
                percentage
            );
        }
    }

    /// Log completion with throughput.
    pub fn finish(&self) {
        let elapsed = self.start_time.elapsed();
        let items_per_sec = self.total as f64 / elapsed.as_secs_f64().max(f64::EPSILON);

        tracing::info!(
            "{}: completed {} items in {:.2}s ({:.1} items/s)",
            self.operation,
            self.total,
            elapsed.as_secs_f64(),
            items_per_sec
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.include_target);
    }

    #[test]
    fn test_log_config_verbose() {
        let config = LogConfig::verbose();
        assert_eq!(config.level, Level::DEBUG);
        assert!(config.include_target);
    }

    #[test]
    fn test_progress_logger_counts() {
        let mut logger = ProgressLogger::new("Test", 100);
        logger.increment();
        logger.increment();
        assert_eq!(logger.current, 2);
    }
}
