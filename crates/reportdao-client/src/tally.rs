use std::collections::HashSet;

use uuid::Uuid;

use reportdao_types::models::{SeverityScore, TallyState};

/// Scores strictly above this corroborate the report.
pub const CORROBORATION_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Upvote.
    Corroborating,
    /// Downvote.
    Refuting,
}

impl Verdict {
    pub fn notice_message(self) -> &'static str {
        match self {
            Self::Corroborating => "Upvoted successfully",
            Self::Refuting => "Downvoted successfully",
        }
    }
}

pub fn classify(score: SeverityScore) -> Verdict {
    if score.value() > CORROBORATION_THRESHOLD {
        Verdict::Corroborating
    } else {
        Verdict::Refuting
    }
}

/// Running counts for one verification view. Each exchange id is counted at
/// most once; counts never go down.
#[derive(Debug, Default)]
pub struct Tally {
    state: TallyState,
    counted: HashSet<Uuid>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if `exchange_id` was already counted.
    pub fn record(&mut self, exchange_id: Uuid, verdict: Verdict) -> bool {
        if !self.counted.insert(exchange_id) {
            return false;
        }
        match verdict {
            Verdict::Corroborating => self.state.corroborating_count += 1,
            Verdict::Refuting => self.state.refuting_count += 1,
        }
        true
    }

    pub fn has_counted(&self, exchange_id: Uuid) -> bool {
        self.counted.contains(&exchange_id)
    }

    pub fn state(&self) -> TallyState {
        self.state
    }

    pub fn corroborating(&self) -> u64 {
        self.state.corroborating_count
    }

    pub fn refuting(&self) -> u64 {
        self.state.refuting_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_strict() {
        assert_eq!(classify(SeverityScore(70.0)), Verdict::Refuting);
        assert_eq!(classify(SeverityScore(70.5)), Verdict::Corroborating);
        assert_eq!(classify(SeverityScore(71.0)), Verdict::Corroborating);
        assert_eq!(classify(SeverityScore(0.0)), Verdict::Refuting);
        assert_eq!(classify(SeverityScore(-5.0)), Verdict::Refuting);
        assert_eq!(classify(SeverityScore(100.0)), Verdict::Corroborating);
    }

    #[test]
    fn classify_matches_rule_across_range() {
        for s in -10..=200 {
            let expected = if s > 70 {
                Verdict::Corroborating
            } else {
                Verdict::Refuting
            };
            assert_eq!(classify(SeverityScore(s as f64)), expected, "score {}", s);
        }
    }

    #[test]
    fn each_exchange_bumps_exactly_one_counter() {
        let mut tally = Tally::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert!(tally.record(a, Verdict::Corroborating));
        assert_eq!(tally.state(), TallyState { corroborating_count: 1, refuting_count: 0 });

        assert!(tally.record(b, Verdict::Refuting));
        assert_eq!(tally.state(), TallyState { corroborating_count: 1, refuting_count: 1 });
    }

    #[test]
    fn retried_exchange_counts_once() {
        let mut tally = Tally::new();
        let id = Uuid::new_v4();

        assert!(tally.record(id, Verdict::Corroborating));
        assert!(!tally.record(id, Verdict::Corroborating));
        assert!(!tally.record(id, Verdict::Refuting));
        assert!(tally.has_counted(id));
        assert_eq!(tally.corroborating(), 1);
        assert_eq!(tally.refuting(), 0);
    }

    #[test]
    fn verdict_wording() {
        assert_eq!(Verdict::Corroborating.notice_message(), "Upvoted successfully");
        assert_eq!(Verdict::Refuting.notice_message(), "Downvoted successfully");
    }
}
