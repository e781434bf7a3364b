//! Fixed loan-duration buckets.

use serde::Serialize;

/// Partition of loan durations in days.
///
/// Bounds are fixed, independent of the largest duration in the data, and
/// the last bucket is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DurationBucket {
    /// Up to and including 7 days.
    UpToOneWeek,
    /// Above 7, up to and including 14.
    UpToTwoWeeks,
    /// Above 14, up to and including 21.
    UpToThreeWeeks,
    /// Above 21.
    OverThreeWeeks,
}

impl DurationBucket {
    pub const ALL: [DurationBucket; 4] = [
        DurationBucket::UpToOneWeek,
        DurationBucket::UpToTwoWeeks,
        DurationBucket::UpToThreeWeeks,
        DurationBucket::OverThreeWeeks,
    ];

    /// Bucket for a finite duration. Anything at or below 7 (including the
    /// never-expected negative) lands in the first bucket.
    pub fn of(days: f64) -> Self {
        if days <= 7.0 {
            DurationBucket::UpToOneWeek
        } else if days <= 14.0 {
            DurationBucket::UpToTwoWeeks
        } else if days <= 21.0 {
            DurationBucket::UpToThreeWeeks
        } else {
            DurationBucket::OverThreeWeeks
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DurationBucket::UpToOneWeek => "≤ 7 days",
            DurationBucket::UpToTwoWeeks => "8–14 days",
            DurationBucket::UpToThreeWeeks => "15–21 days",
            DurationBucket::OverThreeWeeks => "> 21 days",
        }
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|b| b.label()).collect()
    }
}
