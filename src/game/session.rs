use rand::rngs::StdRng;

use crate::game::config::GameConfig;
use crate::game::engine::{ClickOutcome, GameEngine, GameState};
use crate::game::gate::SubmissionGate;

/// One shared game epoch: the engine plus the submission gate it drives.
/// Held behind a single Mutex so every mutating command (click, reset,
/// consume) executes as an indivisible unit.
pub struct GameSession {
    engine: GameEngine,
    gate: SubmissionGate,
}

impl GameSession {
    pub fn new(config: GameConfig, rng: StdRng) -> Self {
        GameSession {
            engine: GameEngine::new(config, rng),
            gate: SubmissionGate::new(),
        }
    }

    /// Resolve a click; the Active -> GameOver transition opens the gate.
    pub fn click(&mut self, row: i64, col: i64) -> ClickOutcome {
        let outcome = self.engine.handle_click(row, col);
        if outcome == ClickOutcome::GameOver {
            self.gate.open_for_current_game();
        }
        outcome
    }

    /// Start a fresh epoch and close the gate for it.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.gate.close_for_new_game();
    }

    /// Cloned, consistent snapshot for broadcast.
    pub fn snapshot(&self) -> GameState {
        self.engine.state().clone()
    }

    /// The sole admission check for score submission.
    pub fn consume_submission(&mut self) -> bool {
        self.gate.consume()
    }

    #[cfg(test)]
    pub(crate) fn from_parts(engine: GameEngine, gate: SubmissionGate) -> Self {
        GameSession { engine, gate }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::{Cell, Color, Shape};
    use rand::SeedableRng;

    fn session_one_click_from_game_over() -> GameSession {
        let filler = Cell::new(Shape::Circle, Color::Yellow);
        let mut board = vec![vec![filler; 6]; 3];
        board[1][1] = Cell::new(Shape::Triangle, Color::Red);
        board[0][1] = Cell::new(Shape::Square, Color::Green);
        board[1][0] = Cell::new(Shape::Diamond, Color::Blue);
        board[1][2] = Cell::new(Shape::Circle, Color::Yellow);
        board[2][1] = Cell::new(Shape::Square, Color::Green);
        let engine = GameEngine::from_state(
            GameConfig::default(),
            StdRng::seed_from_u64(23),
            GameState {
                board,
                score: 9,
                turn: 9,
                game_over: false,
            },
        );
        GameSession::from_parts(engine, SubmissionGate::new())
    }

    #[test]
    fn game_over_opens_the_gate_for_exactly_one_submission() {
        let mut session = session_one_click_from_game_over();
        assert!(!session.consume_submission());

        assert_eq!(session.click(1, 1), ClickOutcome::GameOver);
        assert!(session.consume_submission());
        assert!(!session.consume_submission());
    }

    #[test]
    fn reset_closes_the_gate() {
        let mut session = session_one_click_from_game_over();
        assert_eq!(session.click(1, 1), ClickOutcome::GameOver);

        session.reset();
        assert!(!session.consume_submission());
        assert!(!session.snapshot().game_over);
        assert_eq!(session.snapshot().score, 0);
    }

    #[test]
    fn ignored_clicks_never_touch_the_gate() {
        let mut session = GameSession::new(GameConfig::default(), StdRng::seed_from_u64(2));
        assert_eq!(session.click(-1, 0), ClickOutcome::Ignored);
        assert_eq!(session.click(99, 99), ClickOutcome::Ignored);
        assert!(!session.consume_submission());
    }
}
