use serde::{Deserialize, Serialize};

/// Traffic-source category derived from the HTTP referrer.
///
/// Classification is total: every referrer string maps to exactly one
/// variant. `Direct` is returned only for an empty referrer; `Other` is the
/// fallback for anything unrecognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficSource {
    Direct,
    Instagram,
    Youtube,
    Facebook,
    Whatsapp,
    Tiktok,
    Telegram,
    Other,
}

impl TrafficSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficSource::Direct => "direct",
            TrafficSource::Instagram => "instagram",
            TrafficSource::Youtube => "youtube",
            TrafficSource::Facebook => "facebook",
            TrafficSource::Whatsapp => "whatsapp",
            TrafficSource::Tiktok => "tiktok",
            TrafficSource::Telegram => "telegram",
            TrafficSource::Other => "other",
        }
    }
}

impl std::fmt::Display for TrafficSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a referrer string into a [`TrafficSource`].
///
/// Case-insensitive substring matching against known domain fragments,
/// evaluated in a fixed priority order. The match fragments mirror what the
/// platforms actually put in referrer headers (`youtu.be` short links,
/// `fb.com` redirects, `t.me` deep links).
pub fn detect_source(referrer: &str) -> TrafficSource {
    if referrer.is_empty() {
        return TrafficSource::Direct;
    }

    let ref_lower = referrer.to_lowercase();
    if ref_lower.contains("instagram") {
        TrafficSource::Instagram
    } else if ref_lower.contains("youtube.com") || ref_lower.contains("youtu.be") {
        TrafficSource::Youtube
    } else if ref_lower.contains("facebook.com") || ref_lower.contains("fb.com") {
        TrafficSource::Facebook
    } else if ref_lower.contains("whatsapp") {
        TrafficSource::Whatsapp
    } else if ref_lower.contains("tiktok") {
        TrafficSource::Tiktok
    } else if ref_lower.contains("telegram") || ref_lower.contains("t.me") {
        TrafficSource::Telegram
    } else {
        TrafficSource::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_referrer_is_direct() {
        assert_eq!(detect_source(""), TrafficSource::Direct);
    }

    #[test]
    fn known_platforms_classified() {
        assert_eq!(
            detect_source("https://www.instagram.com/p/abc/"),
            TrafficSource::Instagram
        );
        assert_eq!(
            detect_source("https://youtu.be/dQw4w9WgXcQ"),
            TrafficSource::Youtube
        );
        assert_eq!(
            detect_source("https://m.facebook.com/story"),
            TrafficSource::Facebook
        );
        assert_eq!(
            detect_source("https://web.whatsapp.com/"),
            TrafficSource::Whatsapp
        );
        assert_eq!(
            detect_source("https://www.tiktok.com/@user"),
            TrafficSource::Tiktok
        );
        assert_eq!(detect_source("https://t.me/channel"), TrafficSource::Telegram);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            detect_source("https://WWW.INSTAGRAM.COM/reel/x"),
            TrafficSource::Instagram
        );
        assert_eq!(detect_source("HTTPS://T.ME/x"), TrafficSource::Telegram);
    }

    #[test]
    fn priority_order_is_fixed() {
        // A referrer mentioning several platforms resolves to the first match
        // in priority order.
        assert_eq!(
            detect_source("https://instagram.com/share?next=youtube.com"),
            TrafficSource::Instagram
        );
        assert_eq!(
            detect_source("https://youtube.com/redirect?q=fb.com"),
            TrafficSource::Youtube
        );
    }

    #[test]
    fn unknown_referrer_falls_back_to_other() {
        assert_eq!(
            detect_source("https://news.ycombinator.com/item?id=1"),
            TrafficSource::Other
        );
        assert_eq!(detect_source("gibberish"), TrafficSource::Other);
    }

    #[test]
    fn bare_youtube_word_is_not_youtube() {
        // Only the real domain fragments count, not the word itself.
        assert_eq!(
            detect_source("https://blog.example.com/youtube-tips"),
            TrafficSource::Other
        );
    }
}
