use chrono::Local;
use std::sync::OnceLock;

static LOGGER: OnceLock<Logger> = OnceLock::new();

pub struct Logger {
    prefix: Option<String>,
}

impl Logger {
    fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    pub fn log(&self, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        match &self.prefix {
            Some(prefix) => println!("[{}][{}] {}", timestamp, prefix, message),
            None => println!("[{}] {}", timestamp, message),
        }
    }
}

pub fn init_logger(prefix: Option<String>) {
    LOGGER.get_or_init(|| Logger::new(prefix));
}

/// Logs through the configured logger, or without a prefix when no logger
/// was initialized. Persistence failures are reported here and nowhere else,
/// so logging must never panic or require setup.
pub fn log(message: &str) {
    LOGGER
        .get_or_init(|| Logger::new(None))
        .log(message);
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log(&format!($($arg)*))
    };
}
