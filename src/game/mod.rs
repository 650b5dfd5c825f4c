pub mod board;
pub mod config;
pub mod engine;
pub mod gate;
pub mod session;

// Re-export important types
pub use board::{Board, Cell, Color, Shape};
pub use config::GameConfig;
pub use engine::{ClickOutcome, GameEngine, GameState};
pub use gate::SubmissionGate;
pub use session::GameSession;
