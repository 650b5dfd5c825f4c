/// One-shot admission control: at most one accepted score submission per
/// game epoch. The gate itself is plain state; callers serialize access
/// through the session lock, which makes `consume` an atomic check-and-flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Closed,
    Open,
    Consumed,
}

#[derive(Debug)]
pub struct SubmissionGate {
    state: GateState,
}

impl Default for SubmissionGate {
    fn default() -> Self {
        SubmissionGate::new()
    }
}

impl SubmissionGate {
    pub fn new() -> Self {
        SubmissionGate {
            state: GateState::Closed,
        }
    }

    /// Called exactly once, by the engine's Active -> GameOver transition.
    pub fn open_for_current_game(&mut self) {
        self.state = GateState::Open;
    }

    /// Returns true exactly once per Open period; every other call (still
    /// Closed, or already Consumed) returns false.
    pub fn consume(&mut self) -> bool {
        if self.state == GateState::Open {
            self.state = GateState::Consumed;
            true
        } else {
            false
        }
    }

    /// Called exactly once, by reset.
    pub fn close_for_new_game(&mut self) {
        self.state = GateState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_without_open_always_fails() {
        let mut gate = SubmissionGate::new();
        assert!(!gate.consume());
        assert!(!gate.consume());
    }

    #[test]
    fn open_then_consume_succeeds_exactly_once() {
        let mut gate = SubmissionGate::new();
        gate.open_for_current_game();
        assert!(gate.consume());
        assert!(!gate.consume());
    }

    #[test]
    fn close_after_open_blocks_consumption() {
        let mut gate = SubmissionGate::new();
        gate.open_for_current_game();
        gate.close_for_new_game();
        assert!(!gate.consume());
    }

    #[test]
    fn reopening_after_consumption_allows_one_more() {
        let mut gate = SubmissionGate::new();
        gate.open_for_current_game();
        assert!(gate.consume());
        // Next epoch finishes: the gate opens again for one submission.
        gate.open_for_current_game();
        assert!(gate.consume());
        assert!(!gate.consume());
    }
}
