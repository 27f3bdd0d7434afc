//! Out-of-home time blocks.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A span during which a member is away from home.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutOfHomeEvent {
    pub member_id: String,
    #[serde(default)]
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl OutOfHomeEvent {
    /// Create an event, rejecting empty or inverted ranges.
    pub fn new(
        member_id: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        Ok(Self {
            member_id: member_id.into(),
            title: title.into(),
            start,
            end,
        })
    }

    /// Whether the event covers an instant (start inclusive, end exclusive).
    pub fn covers(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Check if this event overlaps with a time range
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start < end && self.end > start
    }

    /// The part of this event inside `[start, end)`, if any.
    pub fn clip(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.overlaps(start, end)
            .then(|| (self.start.max(start), self.end.min(end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(OutOfHomeEvent::new("a", "Work", at(10), at(9)).is_err());
        assert!(OutOfHomeEvent::new("a", "Work", at(9), at(9)).is_err());
    }

    #[test]
    fn covers_is_half_open() {
        let e = OutOfHomeEvent::new("a", "Work", at(9), at(17)).unwrap();
        assert!(e.covers(at(9)));
        assert!(e.covers(at(16)));
        assert!(!e.covers(at(17)));
    }

    #[test]
    fn clip_limits_to_window() {
        let e = OutOfHomeEvent::new("a", "Work", at(8), at(14)).unwrap();
        assert_eq!(e.clip(at(12), at(18)), Some((at(12), at(14))));
        assert_eq!(e.clip(at(14), at(18)), None);
    }
}
