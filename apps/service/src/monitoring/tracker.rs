use super::types::{ProbeOutcome, TargetStatus, Transition};

/// Consecutive-outcome counts required to confirm a status change
#[derive(Debug, Clone, Copy)]
pub struct DebouncePolicy {
    /// Consecutive failures before a target is confirmed DOWN
    pub down_threshold: u32,
    /// Consecutive successes before a target is confirmed UP
    pub up_threshold: u32,
}

impl Default for DebouncePolicy {
    fn default() -> Self {
        Self { down_threshold: 2, up_threshold: 2 }
    }
}

/// Mutable per-target debounce state consumed by the tracker
///
/// Counters are never carried across a process restart; the store resets
/// them to zero at load so every confirmation starts fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetState {
    pub status: TargetStatus,
    pub consecutive_failures: u32,
    pub consecutive_successes: u32,
}

impl Default for TargetState {
    fn default() -> Self {
        Self { status: TargetStatus::Unknown, consecutive_failures: 0, consecutive_successes: 0 }
    }
}

/// Per-target status state machine with debounce confirmation
///
/// `observe` is a pure function of (state, outcome): replaying an identical
/// outcome sequence through fresh state yields an identical transition
/// sequence.
pub struct StatusTracker {
    policy: DebouncePolicy,
}

impl StatusTracker {
    pub fn new(policy: DebouncePolicy) -> Self {
        Self { policy }
    }

    /// Fold one probe outcome into the target's state
    ///
    /// Returns a [`Transition`] only when the debounce threshold is crossed
    /// for a status the target is not already in; non-confirming outcomes
    /// update counters only.
    pub fn observe(&self, state: &mut TargetState, outcome: &ProbeOutcome) -> Option<Transition> {
        if outcome.success {
            state.consecutive_successes += 1;
            state.consecutive_failures = 0;

            if state.consecutive_successes >= self.policy.up_threshold
                && state.status != TargetStatus::Up
            {
                state.status = TargetStatus::Up;
                return Some(Transition::WentUp);
            }
        } else {
            state.consecutive_failures += 1;
            state.consecutive_successes = 0;

            if state.consecutive_failures >= self.policy.down_threshold
                && state.status != TargetStatus::Down
            {
                state.status = TargetStatus::Down;
                return Some(Transition::WentDown);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::types::ProbeErrorKind;

    fn tracker(down: u32, up: u32) -> StatusTracker {
        StatusTracker::new(DebouncePolicy { down_threshold: down, up_threshold: up })
    }

    fn ok() -> ProbeOutcome {
        ProbeOutcome::new().success(10, Some(200))
    }

    fn fail() -> ProbeOutcome {
        ProbeOutcome::new().failure(ProbeErrorKind::Timeout, "request timed out")
    }

    fn replay(tracker: &StatusTracker, outcomes: &[ProbeOutcome]) -> Vec<Transition> {
        let mut state = TargetState::default();
        outcomes.iter().filter_map(|o| tracker.observe(&mut state, o)).collect()
    }

    #[test]
    fn test_two_failures_confirm_down() {
        let t = tracker(2, 2);
        let transitions = replay(&t, &[fail(), fail()]);
        assert_eq!(transitions, vec![Transition::WentDown]);
    }

    #[test]
    fn test_down_then_recovery() {
        let t = tracker(2, 2);
        let transitions = replay(&t, &[fail(), fail(), ok(), ok()]);
        assert_eq!(transitions, vec![Transition::WentDown, Transition::WentUp]);
    }

    #[test]
    fn test_flapping_never_confirms() {
        let t = tracker(2, 2);
        let transitions = replay(&t, &[fail(), ok(), fail()]);
        assert!(transitions.is_empty());
    }

    #[test]
    fn test_down_fires_exactly_once() {
        let t = tracker(2, 2);
        let transitions = replay(&t, &[fail(), fail(), fail(), fail()]);
        assert_eq!(transitions, vec![Transition::WentDown]);
    }

    #[test]
    fn test_single_failure_threshold() {
        let t = tracker(1, 1);
        let transitions = replay(&t, &[fail(), ok(), fail()]);
        assert_eq!(
            transitions,
            vec![Transition::WentDown, Transition::WentUp, Transition::WentDown]
        );
    }

    #[test]
    fn test_unknown_converges_to_up() {
        let t = tracker(2, 2);
        let mut state = TargetState::default();

        assert_eq!(t.observe(&mut state, &ok()), None);
        assert_eq!(t.observe(&mut state, &ok()), Some(Transition::WentUp));
        assert_eq!(state.status, TargetStatus::Up);
    }

    #[test]
    fn test_counters_reset_on_opposite_outcome() {
        let t = tracker(3, 3);
        let mut state = TargetState::default();

        t.observe(&mut state, &fail());
        t.observe(&mut state, &fail());
        t.observe(&mut state, &ok());

        assert_eq!(state.consecutive_failures, 0);
        assert_eq!(state.consecutive_successes, 1);
        assert_eq!(state.status, TargetStatus::Unknown);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let t = tracker(2, 2);
        let sequence =
            vec![fail(), ok(), fail(), fail(), ok(), ok(), fail(), fail(), fail(), ok(), ok()];

        let first = replay(&t, &sequence);
        let second = replay(&t, &sequence);

        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![Transition::WentDown, Transition::WentUp, Transition::WentDown, Transition::WentUp]
        );
    }
}
