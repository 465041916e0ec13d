//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use std::collections::HashMap;

/// Generate a new UUID v4
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a session token derived from the creation time
///
/// The millisecond timestamp keeps tokens roughly ordered; the random suffix
/// keeps two sessions created within the same millisecond distinct.
pub fn generate_session_id(created_at: DateTime<Utc>) -> String {
    format!("{}-{}", created_at.timestamp_millis(), generate_random_string(6).to_lowercase())
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Truncate text to `max_chars` characters, appending an ellipsis when cut
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

/// Parse key-value pairs from text (e.g., "key1=value1 key2=value2")
pub fn parse_key_value_pairs(text: &str) -> HashMap<String, String> {
    let mut pairs = HashMap::new();

    for part in text.split_whitespace() {
        if let Some((key, value)) = part.split_once('=') {
            pairs.insert(key.to_string(), value.to_string());
        }
    }

    pairs
}

/// Generate a random alphanumeric string
pub fn generate_random_string(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                            abcdefghijklmnopqrstuvwxyz\
                            0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
