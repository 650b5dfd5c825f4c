use crate::game::board::{Color, Shape};

/// Tunables for one game session. The algorithms never hardcode these;
/// everything is supplied here at construction time.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub shapes: Vec<Shape>,
    pub colors: Vec<Color>,
    /// Turns a cell stays locked after being clicked.
    pub cooldown: u32,
    /// How many whole-grid generation attempts before falling back to the
    /// degenerate all-default board.
    pub max_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            rows: 3,
            cols: 6,
            shapes: Shape::ALL.to_vec(),
            colors: Color::ALL.to_vec(),
            cooldown: 3,
            max_attempts: 10_000,
        }
    }
}
