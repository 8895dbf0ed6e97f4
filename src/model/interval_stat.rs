//! `IntervalStat` — a 10-minute log-count bucket, accumulated across flushes.

/// Count of logs created within one 10-minute interval. `interval_start` is
/// the floored tick returned by [`crate::model::tick::floor_to_interval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalStat {
    pub interval_start: i64,
    pub log_count: i32,
}

impl IntervalStat {
    /// A fresh bucket for `interval_start` with one log counted.
    #[must_use]
    pub const fn starting(interval_start: i64) -> Self {
        Self {
            interval_start,
            log_count: 1,
        }
    }

    /// Fold another batch's count for the same interval into this one —
    /// upsert-accumulate, never overwrite.
    pub fn accumulate(&mut self, additional: i32) {
        self.log_count += additional;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulate_adds_rather_than_overwrites() {
        let mut stat = IntervalStat::starting(100);
        stat.accumulate(4);
        assert_eq!(stat.log_count, 5);
    }
}
