use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Rate-limit bucket shared by every request whose address cannot be resolved.
pub const UNKNOWN_CLIENT: &str = "unknown";

pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_EMAIL_CHARS: usize = 255;
pub const MAX_MESSAGE_CHARS: usize = 1000;
pub const MIN_MESSAGE_CHARS: usize = 10;

pub const DEFAULT_RATE_LIMIT_MAX: u32 = 5;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60 * 60;

/// Largest contact request body read from the wire. Anything bigger cannot
/// fit the field caps and is answered as "Input too long".
pub const MAX_CONTACT_BODY_BYTES: usize = 64 * 1024;
