use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Hash a client network address for storage.
///
/// Formula: sha256(ip)[0..8] encoded as 16 hex chars. One-way and truncated
/// so plaintext addresses never reach the database; the same address always
/// hashes to the same value, which is what keys visitor deduplication.
pub fn hash_ip(ip: &str) -> String {
    let hash = Sha256::digest(ip.as_bytes());
    hex::encode(&hash[..8])
}

/// Shorten an `ip_hash` for display in admin views ("a1b2c3d4...").
pub fn abbreviate_hash(ip_hash: &str) -> String {
    let prefix: String = ip_hash.chars().take(8).collect();
    format!("{prefix}...")
}

/// Render a timestamp as a relative label against `now`.
///
/// Buckets: days, then hours, then minutes, then "just now". Singular and
/// plural forms are spelled out ("1 hour ago" vs "2 hours ago").
pub fn time_ago(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(at);

    let days = diff.num_days();
    if days > 0 {
        return format!("{} day{} ago", days, if days > 1 { "s" } else { "" });
    }

    let seconds = diff.num_seconds().max(0);
    if seconds > 3600 {
        let hours = seconds / 3600;
        format!("{} hour{} ago", hours, if hours > 1 { "s" } else { "" })
    } else if seconds > 60 {
        let minutes = seconds / 60;
        format!("{} minute{} ago", minutes, if minutes > 1 { "s" } else { "" })
    } else {
        "just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn hash_ip_is_16_hex_chars() {
        let h = hash_ip("203.0.113.9");
        assert_eq!(h.len(), 16);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn hash_ip_is_deterministic_and_distinct() {
        assert_eq!(hash_ip("203.0.113.9"), hash_ip("203.0.113.9"));
        assert_ne!(hash_ip("203.0.113.9"), hash_ip("203.0.113.10"));
    }

    #[test]
    fn abbreviate_hash_takes_eight_chars() {
        assert_eq!(abbreviate_hash("a1b2c3d4e5f60718"), "a1b2c3d4...");
    }

    #[test]
    fn time_ago_buckets() {
        let now = Utc::now();
        assert_eq!(time_ago(now - Duration::seconds(30), now), "just now");
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(time_ago(now - Duration::minutes(1) - Duration::seconds(5), now), "1 minute ago");
        assert_eq!(time_ago(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(time_ago(now - Duration::days(1), now), "1 day ago");
        assert_eq!(time_ago(now - Duration::days(4), now), "4 days ago");
    }
}
