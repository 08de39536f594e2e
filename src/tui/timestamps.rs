use chrono::Utc;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// How long ago a key was last written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBucket {
    /// Written before timestamps were tracked (`updated_at == 0`).
    Unknown,
    /// Under 30 days.
    Fresh,
    /// 30 to 89 days.
    Aging,
    /// 90 days or more.
    Stale,
}

impl AgeBucket {
    pub fn glyph(self) -> &'static str {
        match self {
            AgeBucket::Unknown => "○",
            _ => "●",
        }
    }
}

/// Bucket `updated_at` relative to `now`, both unix seconds.
///
/// Timestamps in the future count as fresh.
pub fn age_bucket(updated_at: i64, now: i64) -> AgeBucket {
    if updated_at == 0 {
        return AgeBucket::Unknown;
    }

    let days = now.saturating_sub(updated_at).max(0) / SECONDS_PER_DAY;
    if days < 30 {
        AgeBucket::Fresh
    } else if days < 90 {
        AgeBucket::Aging
    } else {
        AgeBucket::Stale
    }
}

pub fn now_unix() -> i64 {
    Utc::now().timestamp()
}
