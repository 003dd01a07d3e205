use serde::{Deserialize, Serialize};

// ── Aggregated channel record ─────────────────────────────────────────────────

/// The merged stats record served to consumers. Every optional field stays
/// `null` rather than failing when no source produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub title: String,
    #[serde(rename = "channelId")]
    pub channel_id: String,
    pub handle: String,
    #[serde(rename = "subscriberCount")]
    pub subscriber_count: Option<u64>,
    #[serde(rename = "subscriberText")]
    pub subscriber_text: Option<String>,
    #[serde(rename = "videoCount")]
    pub video_count: Option<u64>,
    #[serde(rename = "viewCount")]
    pub view_count: Option<u64>,
    #[serde(rename = "viewText")]
    pub view_text: Option<String>,
    #[serde(rename = "avatarUrl")]
    pub avatar_url: Option<String>,
    /// Wall-clock milliseconds at aggregation time.
    #[serde(rename = "fetchedAt")]
    pub fetched_at: u64,
    /// Set only when the record was re-served after a failed refresh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale: Option<bool>,
}

// ── Structured stats client payloads ──────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct ChannelInfo {
    pub author: String,
    /// Ascending resolution; the last entry is the sharpest.
    pub author_thumbnails: Vec<Thumbnail>,
    pub subscriber_count: Option<u64>,
    pub subscriber_text: Option<String>,
    /// Present when the channel page carries an alert instead of data.
    pub alert_message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChannelStats {
    pub view_count: Option<u64>,
}

// ── Per-source extraction result ──────────────────────────────────────────────

/// The fields one source managed to produce. Sources are merged in precedence
/// order with [`PartialStats::fill_missing`]; a populated field is never
/// overwritten by a later source.
#[derive(Debug, Clone, Default)]
pub struct PartialStats {
    pub subscriber_count: Option<u64>,
    pub subscriber_text: Option<String>,
    pub video_count: Option<u64>,
    pub view_count: Option<u64>,
    pub view_text: Option<String>,
    pub avatar_url: Option<String>,
}

impl PartialStats {
    pub fn from_info(info: &ChannelInfo) -> Self {
        Self {
            subscriber_count: info.subscriber_count,
            subscriber_text: info.subscriber_text.clone(),
            avatar_url: info.author_thumbnails.last().map(|t| t.url.clone()),
            ..Self::default()
        }
    }

    pub fn from_stats(stats: &ChannelStats) -> Self {
        Self {
            view_count: stats.view_count,
            view_text: stats.view_count.map(|n| n.to_string()),
            ..Self::default()
        }
    }

    /// Fills this result's empty fields from `later`; populated fields keep
    /// their value. Folding an ordered source list left-to-right with this
    /// combinator realizes the precedence policy.
    pub fn fill_missing(mut self, later: PartialStats) -> Self {
        self.subscriber_count = self.subscriber_count.or(later.subscriber_count);
        self.subscriber_text = self.subscriber_text.or(later.subscriber_text);
        self.video_count = self.video_count.or(later.video_count);
        self.view_count = self.view_count.or(later.view_count);
        self.view_text = self.view_text.or(later.view_text);
        self.avatar_url = self.avatar_url.or(later.avatar_url);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earlier_source_wins_over_later_one() {
        let api = PartialStats {
            subscriber_count: Some(500),
            ..PartialStats::default()
        };
        let html = PartialStats {
            subscriber_count: Some(600),
            video_count: Some(42),
            ..PartialStats::default()
        };

        let merged = api.fill_missing(html);
        assert_eq!(merged.subscriber_count, Some(500));
        assert_eq!(merged.video_count, Some(42));
    }

    #[test]
    fn fold_fills_only_what_is_still_missing() {
        let sources = vec![
            PartialStats {
                subscriber_text: Some("1.07M subscribers".into()),
                ..PartialStats::default()
            },
            PartialStats {
                subscriber_text: Some("ignored".into()),
                view_count: Some(9_000),
                ..PartialStats::default()
            },
            PartialStats {
                avatar_url: Some("https://yt3.example/avatar.jpg".into()),
                ..PartialStats::default()
            },
        ];

        let merged = sources
            .into_iter()
            .fold(PartialStats::default(), PartialStats::fill_missing);

        assert_eq!(merged.subscriber_text.as_deref(), Some("1.07M subscribers"));
        assert_eq!(merged.view_count, Some(9_000));
        assert_eq!(
            merged.avatar_url.as_deref(),
            Some("https://yt3.example/avatar.jpg")
        );
        assert_eq!(merged.video_count, None);
    }

    #[test]
    fn empty_source_in_the_middle_does_not_block_later_fills() {
        let sources = vec![
            PartialStats::default(),
            PartialStats {
                video_count: Some(128),
                ..PartialStats::default()
            },
        ];

        let merged = sources
            .into_iter()
            .fold(PartialStats::default(), PartialStats::fill_missing);
        assert_eq!(merged.video_count, Some(128));
    }

    #[test]
    fn info_partial_takes_the_last_thumbnail() {
        let info = ChannelInfo {
            author: "Example".into(),
            author_thumbnails: vec![
                Thumbnail {
                    url: "small.jpg".into(),
                    width: 88,
                    height: 88,
                },
                Thumbnail {
                    url: "large.jpg".into(),
                    width: 176,
                    height: 176,
                },
            ],
            subscriber_count: Some(1_070_000),
            subscriber_text: Some("1.07M subscribers".into()),
            alert_message: None,
        };

        let partial = PartialStats::from_info(&info);
        assert_eq!(partial.avatar_url.as_deref(), Some("large.jpg"));
        assert_eq!(partial.subscriber_count, Some(1_070_000));
        assert_eq!(partial.view_count, None);
    }

    #[test]
    fn stats_partial_renders_the_numeric_view_text() {
        let partial = PartialStats::from_stats(&ChannelStats {
            view_count: Some(123_456_789),
        });
        assert_eq!(partial.view_count, Some(123_456_789));
        assert_eq!(partial.view_text.as_deref(), Some("123456789"));

        let empty = PartialStats::from_stats(&ChannelStats { view_count: None });
        assert_eq!(empty.view_text, None);
    }

    #[test]
    fn record_serializes_camel_case_with_nulls() {
        let record = ChannelRecord {
            title: "Example".into(),
            channel_id: "UCabc".into(),
            handle: "@example".into(),
            subscriber_count: Some(500),
            subscriber_text: None,
            video_count: None,
            view_count: None,
            view_text: None,
            avatar_url: None,
            fetched_at: 1_700_000_000_000,
            stale: None,
        };

        let v = serde_json::to_value(&record).unwrap();
        assert_eq!(v["channelId"], "UCabc");
        assert_eq!(v["subscriberCount"], 500);
        assert!(v["subscriberText"].is_null());
        assert_eq!(v["fetchedAt"], 1_700_000_000_000u64);
        assert!(v.get("stale").is_none());
    }

    #[test]
    fn stale_flag_appears_only_when_set() {
        let mut record = ChannelRecord {
            title: "Example".into(),
            channel_id: "UCabc".into(),
            handle: "@example".into(),
            subscriber_count: None,
            subscriber_text: None,
            video_count: None,
            view_count: None,
            view_text: None,
            avatar_url: None,
            fetched_at: 0,
            stale: None,
        };
        record.stale = Some(true);

        let v = serde_json::to_value(&record).unwrap();
        assert_eq!(v["stale"], true);
    }
}
