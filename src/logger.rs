use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, Metadata, Record};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::io::{self, Write};
use std::panic::Location;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

static FUNCTION_LOGGER: Lazy<FunctionLogger> = Lazy::new(FunctionLogger::new);

pub fn init_with_config(config: LoggerConfig) -> Result<(), String> {
    FUNCTION_LOGGER.update_config(config.clone());

    if let Err(e) = log::set_logger(&*FUNCTION_LOGGER) {
        return Err(format!("Failed to set logger: {:?}", e));
    }

    log::set_max_level(config.min_level.to_log_level_filter());
    Ok(())
}

/// Tags every following entry with the invocation's request id.
pub fn set_request_id(request_id: Option<String>) {
    FUNCTION_LOGGER.set_request_id(request_id);
}

/// Renders an error and all of its sources as a single line.
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    pub fn color(&self) -> Color {
        match self {
            LogLevel::Trace => Color::Cyan,
            LogLevel::Debug => Color::Blue,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            LogLevel::Trace => "🔍",
            LogLevel::Debug => "🐛",
            LogLevel::Info => "💡",
            LogLevel::Warn => "⚠️",
            LogLevel::Error => "❌",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    pub fn to_log_level(&self) -> Level {
        match self {
            LogLevel::Trace => Level::Trace,
            LogLevel::Debug => Level::Debug,
            LogLevel::Info => Level::Info,
            LogLevel::Warn => Level::Warn,
            LogLevel::Error => Level::Error,
        }
    }

    pub fn to_log_level_filter(&self) -> log::LevelFilter {
        self.to_log_level().to_level_filter()
    }

    pub fn from_log_level(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

/// One structured log line as written in JSON mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub module: String,
    pub file: String,
    pub line: u32,
    pub request_id: Option<String>,
    pub duration_ms: Option<u64>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: String, module: String, file: String, line: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            level,
            message,
            module,
            file,
            line,
            request_id: None,
            duration_ms: None,
        }
    }

    pub fn with_request_id(mut self, request_id: String) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = Some(duration.as_millis() as u64);
        self
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub show_colors: bool,
    pub show_emojis: bool,
    pub show_file_location: bool,
    pub show_module: bool,
    pub include_timestamp: bool,
    pub timestamp_format: String,
    pub output_json: bool,
    pub custom_prefix: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: true,
            show_emojis: true,
            show_file_location: true,
            show_module: true,
            include_timestamp: true,
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            output_json: false,
            custom_prefix: None,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }

    pub fn with_json_output(mut self, enabled: bool) -> Self {
        self.output_json = enabled;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.custom_prefix = Some(prefix.into());
        self
    }

    /// CloudWatch-friendly: one JSON object per line, no colors.
    pub fn production() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: false,
            show_emojis: false,
            output_json: true,
            ..Default::default()
        }
    }

    pub fn development() -> Self {
        Self {
            min_level: LogLevel::Debug,
            show_colors: true,
            show_emojis: true,
            output_json: false,
            show_file_location: true,
            ..Default::default()
        }
    }

    /// Reads `LOG_LEVEL` and `LOG_FORMAT` (`json` or `pretty`), starting from
    /// the production profile.
    pub fn from_env() -> Self {
        let mut config = Self::production();
        if let Some(level) = env::var("LOG_LEVEL").ok().and_then(|v| LogLevel::parse(&v)) {
            config.min_level = level;
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            if format.eq_ignore_ascii_case("pretty") {
                config.output_json = false;
                config.show_emojis = true;
            }
        }
        config
    }
}

pub struct FunctionLogger {
    config: Mutex<LoggerConfig>,
    request_id: Mutex<Option<String>>,
}

impl FunctionLogger {
    pub fn new() -> Self {
        Self {
            config: Mutex::new(LoggerConfig::default()),
            request_id: Mutex::new(None),
        }
    }

    pub fn update_config(&self, new_config: LoggerConfig) {
        if let Ok(mut config) = self.config.lock() {
            *config = new_config;
        }
    }

    pub fn set_request_id(&self, request_id: Option<String>) {
        if let Ok(mut current) = self.request_id.lock() {
            *current = request_id;
        }
    }

    fn format_console_output(&self, entry: &LogEntry, config: &LoggerConfig) -> String {
        let mut output = String::new();

        if let Some(prefix) = &config.custom_prefix {
            if config.show_colors {
                output.push_str(&format!("[{}] ", prefix.bright_white().bold()));
            } else {
                output.push_str(&format!("[{}] ", prefix));
            }
        }

        if config.include_timestamp {
            let timestamp = entry.timestamp.format(&config.timestamp_format);
            if config.show_colors {
                output.push_str(&format!("{} ", timestamp.to_string().bright_black()));
            } else {
                output.push_str(&format!("{} ", timestamp));
            }
        }

        let level_str = if config.show_emojis {
            format!("{} {}", entry.level.emoji(), entry.level.as_str())
        } else {
            entry.level.as_str().to_string()
        };

        if config.show_colors {
            output.push_str(&format!(
                "[{}] ",
                level_str.color(entry.level.color()).bold()
            ));
        } else {
            output.push_str(&format!("[{}] ", level_str));
        }

        if config.show_module && !entry.module.is_empty() {
            if config.show_colors {
                output.push_str(&format!("{}::", entry.module.bright_blue()));
            } else {
                output.push_str(&format!("{}::", entry.module));
            }
        }

        if config.show_colors {
            output.push_str(&entry.message.white().bold().to_string());
        } else {
            output.push_str(&entry.message);
        }

        if let Some(request_id) = &entry.request_id {
            if config.show_colors {
                output.push_str(&format!(" [req:{}]", request_id.bright_yellow()));
            } else {
                output.push_str(&format!(" [req:{}]", request_id));
            }
        }

        if let Some(duration) = entry.duration_ms {
            if config.show_colors {
                output.push_str(&format!(" [{}ms]", duration.to_string().bright_magenta()));
            } else {
                output.push_str(&format!(" [{}ms]", duration));
            }
        }

        if config.show_file_location {
            let location = format!("{}:{}", entry.file, entry.line);
            if config.show_colors {
                output.push_str(&format!(" ({})", location.bright_black()));
            } else {
                output.push_str(&format!(" ({})", location));
            }
        }

        output
    }

    fn create_log_entry(&self, record: &Record) -> LogEntry {
        LogEntry::new(
            LogLevel::from_log_level(record.level()),
            record.args().to_string(),
            record.module_path().unwrap_or("unknown").to_string(),
            record.file().unwrap_or("unknown").to_string(),
            record.line().unwrap_or(0),
        )
    }

    /// Writes an entry, tagged with the current request id.
    fn emit(&self, entry: LogEntry) {
        let entry = match self.request_id.lock().ok().and_then(|id| id.clone()) {
            Some(request_id) => entry.with_request_id(request_id),
            None => entry,
        };

        if let Ok(config) = self.config.lock() {
            if config.output_json {
                println!("{}", serde_json::to_string(&entry).unwrap_or_default());
            } else {
                println!("{}", self.format_console_output(&entry, &config));
            }
        }
    }
}

impl Default for FunctionLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl log::Log for FunctionLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if let Ok(config) = self.config.lock() {
            metadata.level() <= config.min_level.to_log_level()
        } else {
            true
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.emit(self.create_log_entry(record));
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

/// Logs how long a named step took when stopped or dropped.
///
/// The entry carries `duration_ms` and points at the line that started the timer.
pub struct Timer {
    start: Instant,
    name: String,
    location: &'static Location<'static>,
}

impl Timer {
    #[track_caller]
    pub fn new(name: &str) -> Self {
        log::debug!("⏱️  Starting timer: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
            location: Location::caller(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn entry(&self) -> LogEntry {
        LogEntry::new(
            LogLevel::Info,
            format!("⏱️  Timer '{}' completed", self.name),
            module_path!().to_string(),
            self.location.file().to_string(),
            self.location.line(),
        )
        .with_duration(self.elapsed())
    }

    pub fn stop(&self) {
        if log::log_enabled!(Level::Info) {
            FUNCTION_LOGGER.emit(self.entry());
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[track_caller]
pub fn timer(name: &str) -> Timer {
    Timer::new(name)
}

pub fn log_function_start(function_name: &str, config: &crate::config::FunctionConfig) {
    log::info!("🚀 Starting {} v{}", function_name, env!("CARGO_PKG_VERSION"));
    log::info!("⚙️  Configuration loaded:");
    log::info!("   Bucket: {}", config.bucket_name);
    log::info!("   Model: {}", config.image.model_id);
    log::info!(
        "   Image: {}x{} quality={} cfgScale={} count={}",
        config.image.width,
        config.image.height,
        config.image.quality,
        config.image.cfg_scale,
        config.image.number_of_images
    );
    log::info!("   Bedrock region: {}", config.bedrock.region_or_default());
    log::info!("   S3 region: {}", config.s3.region_or_default());
    log::info!("   URL expiry: {}s", config.presigned_url_expires_in);
    log::info!(
        "   Unique object keys: {}",
        if config.unique_object_keys { "✅" } else { "❌" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl std::fmt::Display for Outer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "upload failed")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(LogLevel::Info.as_str(), "INFO");
        assert_eq!(LogLevel::Error.emoji(), "❌");
        assert_eq!(LogLevel::Debug.color(), Color::Blue);
        assert_eq!(LogLevel::parse("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("loud"), None);
    }

    #[test]
    fn test_logger_config() {
        let config = LoggerConfig::development();
        assert_eq!(config.min_level, LogLevel::Debug);
        assert!(config.show_colors);

        let prod_config = LoggerConfig::production();
        assert!(!prod_config.show_colors);
        assert!(prod_config.output_json);
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let err = Outer(std::io::Error::new(std::io::ErrorKind::Other, "socket closed"));
        assert_eq!(error_chain(&err), "upload failed: socket closed");
    }

    #[test]
    fn test_plain_console_format() {
        let logger = FunctionLogger::new();
        let config = LoggerConfig::new()
            .with_colors(false)
            .with_prefix("image_generator");
        let entry = LogEntry::new(
            LogLevel::Info,
            "hello".into(),
            "rgenpage".into(),
            "src/lib.rs".into(),
            7,
        )
        .with_request_id("req-1".into())
        .with_duration(Duration::from_millis(12));

        let line = logger.format_console_output(&entry, &config);
        assert!(line.starts_with("[image_generator] "));
        assert!(line.contains("rgenpage::hello"));
        assert!(line.contains("[req:req-1]"));
        assert!(line.contains("[12ms]"));
        assert!(line.ends_with("(src/lib.rs:7)"));
    }

    #[test]
    fn test_timer_entry_carries_duration() {
        let timer = timer("upload");
        let start_line = line!() - 1;
        std::thread::sleep(Duration::from_millis(5));

        let entry = timer.entry();
        assert_eq!(entry.message, "⏱️  Timer 'upload' completed");
        assert!(entry.duration_ms.unwrap() >= 5);
        assert!(entry.file.ends_with("logger.rs"));
        assert_eq!(entry.line, start_line);

        let config = LoggerConfig::new().with_colors(false);
        let line = FunctionLogger::new().format_console_output(&entry, &config);
        assert!(line.contains(&format!("[{}ms]", entry.duration_ms.unwrap())));
    }
}
