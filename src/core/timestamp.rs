use chrono::{DateTime, Local, TimeZone};

/// Layout of the timestamp the gateway expects: `YYYYMMDDHHmmss`
pub const GATEWAY_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Format an instant as the 14-digit gateway timestamp, in the instant's own timezone
pub fn format_timestamp<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    time.format(GATEWAY_TIMESTAMP_FORMAT).to_string()
}

/// Gateway timestamp for the current local time
pub fn current_timestamp() -> String {
    format_timestamp(&Local::now())
}
