use chrono::{DateTime, Local, TimeZone};

/// Format used in deploy commit messages, e.g. `2024-05-01 13:07`.
pub const DEPLOY_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Current local wall-clock time as a deploy stamp.
pub fn deploy_stamp() -> String {
    format_stamp(&Local::now())
}

pub fn format_stamp<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format(DEPLOY_STAMP_FORMAT).to_string()
}
