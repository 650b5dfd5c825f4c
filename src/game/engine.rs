use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::game::board::{self, Board, Cell};
use crate::game::config::GameConfig;

/// Full snapshot of the shared game, broadcast to every observer after any
/// accepted command. Wire shape: {board, score, turn, gameOver}.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub board: Board,
    pub score: u32,
    pub turn: u32,
    pub game_over: bool,
}

/// Result of resolving one click command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Stale or illegal input; no state changed. Expected on a shared
    /// real-time surface, so not an error.
    Ignored,
    /// A legal replacement pair was written; score and turn advanced.
    Moved,
    /// The clicked cell had no legal replacement pair; the game is over and
    /// the board is frozen in its last valid configuration.
    GameOver,
}

/// Owns the authoritative `GameState` for one epoch at a time. All mutation
/// goes through `handle_click` and `reset`; callers re-read the snapshot for
/// broadcast after any non-Ignored outcome.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    state: GameState,
}

impl GameEngine {
    pub fn new(config: GameConfig, mut rng: StdRng) -> Self {
        let board = board::generate_board(&config, &mut rng);
        GameEngine {
            config,
            rng,
            state: GameState {
                board,
                score: 0,
                turn: 0,
                game_over: false,
            },
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Discard the current epoch and start a fresh one on a newly generated
    /// board. Never fails.
    pub fn reset(&mut self) {
        self.state = GameState {
            board: board::generate_board(&self.config, &mut self.rng),
            score: 0,
            turn: 0,
            game_over: false,
        };
    }

    /// Resolve a click at (row, col). Illegal input never errors; it
    /// degrades to `Ignored` with no mutation.
    pub fn handle_click(&mut self, row: i64, col: i64) -> ClickOutcome {
        if self.state.game_over {
            return ClickOutcome::Ignored;
        }
        if row < 0 || col < 0 {
            return ClickOutcome::Ignored;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.config.rows || col >= self.config.cols {
            return ClickOutcome::Ignored;
        }
        if self.state.board[row][col].cooldown > 0 {
            return ClickOutcome::Ignored;
        }

        let options = board::legal_replacement_pairs(&self.state.board, &self.config, row, col);
        match options.choose(&mut self.rng).copied() {
            Some((shape, color)) => {
                self.state.board[row][col] = Cell {
                    shape,
                    color,
                    cooldown: self.config.cooldown,
                };
                self.state.score += 1;
                self.advance_turn();
                ClickOutcome::Moved
            }
            None => {
                self.state.game_over = true;
                ClickOutcome::GameOver
            }
        }
    }

    /// Runs once per accepted move, over the whole board including the
    /// just-clicked cell, so a fresh cooldown of 3 nets to 2 in the same
    /// step and reaches 0 three moves later.
    fn advance_turn(&mut self) {
        self.state.turn += 1;
        for row in &mut self.state.board {
            for cell in row {
                cell.cooldown = cell.cooldown.saturating_sub(1);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn from_state(config: GameConfig, rng: StdRng, state: GameState) -> Self {
        GameEngine { config, rng, state }
    }
}
