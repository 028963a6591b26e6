use log::LevelFilter;

pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

/// Translates one of "debug", "info", "warning", "error" to a level filter.
/// Anything else maps to the default level.
pub fn parse_log_level(level: &str) -> LevelFilter {
    match level {
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warning" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => DEFAULT_LEVEL,
    }
}

/// Adjusts the maximum level of whichever `log` implementation is installed.
pub fn set_log_level(level: &str) {
    log::set_max_level(parse_log_level(level));
}
