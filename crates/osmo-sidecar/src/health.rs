//! Health verdict over a status snapshot.
//!
//! A node is DOWN when it reports itself catching up, or when its latest
//! block is at least a minute old outside the tolerated epoch window.

use chrono::{DateTime, Utc};

use crate::status::NodeStatus;

/// Staleness threshold outside the epoch window.
pub const MAX_BLOCK_STALENESS_SECS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthVerdict {
    Up,
    Down,
}

impl HealthVerdict {
    pub fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
        }
    }
}

impl std::fmt::Display for HealthVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict plus the observational fields shown on `/health`.
#[derive(Debug, Clone)]
pub struct HealthReport {
    pub verdict: HealthVerdict,
    pub height: String,
    pub seconds_since_last_block: i64,
}

/// Evaluate the health rule for one status snapshot.
///
/// `is_epoch` is the epoch-window flag from
/// [`EpochTracker`](crate::epoch::EpochTracker); `now` is passed in so tests
/// control time. Height and elapsed seconds are carried for display only and
/// never affect the verdict.
pub fn evaluate(status: &NodeStatus, is_epoch: bool, now: DateTime<Utc>) -> HealthReport {
    let sync = &status.result.sync_info;
    let seconds_since_last_block = (now - sync.latest_block_time).num_seconds();

    let down = sync.catching_up
        || (seconds_since_last_block >= MAX_BLOCK_STALENESS_SECS && !is_epoch);

    HealthReport {
        verdict: if down {
            HealthVerdict::Down
        } else {
            HealthVerdict::Up
        },
        height: sync.latest_block_height.clone(),
        seconds_since_last_block,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_status;
    use chrono::Duration;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn fresh_block_is_up() {
        let now = ts("2023-01-01T12:00:00Z");
        let status = sample_status("100", now - Duration::seconds(59), false);

        let report = evaluate(&status, false, now);
        assert_eq!(report.verdict, HealthVerdict::Up);
        assert_eq!(report.seconds_since_last_block, 59);
        assert_eq!(report.height, "100");
    }

    #[test]
    fn catching_up_is_down_regardless_of_staleness() {
        let now = ts("2023-01-01T12:00:00Z");
        let status = sample_status("100", now, true);

        assert_eq!(evaluate(&status, false, now).verdict, HealthVerdict::Down);
        // Not even the epoch window excuses catching up.
        assert_eq!(evaluate(&status, true, now).verdict, HealthVerdict::Down);
    }

    #[test]
    fn stale_block_is_down_outside_epoch() {
        let now = ts("2023-01-01T12:00:00Z");
        let status = sample_status("100", now - Duration::seconds(60), false);

        let report = evaluate(&status, false, now);
        assert_eq!(report.verdict, HealthVerdict::Down);
        assert_eq!(report.seconds_since_last_block, 60);
    }

    #[test]
    fn stale_block_is_tolerated_inside_epoch() {
        let now = ts("2023-01-01T12:00:00Z");
        let status = sample_status("100", now - Duration::seconds(300), false);

        assert_eq!(evaluate(&status, true, now).verdict, HealthVerdict::Up);
    }

    #[test]
    fn elapsed_seconds_truncate_fractions() {
        let now = ts("2023-01-01T12:00:00.900Z");
        let status = sample_status("100", ts("2023-01-01T12:00:00Z"), false);

        assert_eq!(evaluate(&status, false, now).seconds_since_last_block, 0);
    }

    #[test]
    fn verdict_display() {
        assert_eq!(HealthVerdict::Up.to_string(), "UP");
        assert_eq!(HealthVerdict::Down.to_string(), "DOWN");
        assert!(HealthVerdict::Up.is_up());
        assert!(!HealthVerdict::Down.is_up());
    }
}
