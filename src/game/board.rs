use log::warn;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::game::config::GameConfig;

/// Shape of a cell, one of the four configured variants.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Triangle,
    Square,
    Diamond,
    Circle,
}

impl Shape {
    pub const ALL: [Shape; 4] = [Shape::Triangle, Shape::Square, Shape::Diamond, Shape::Circle];
}

/// Color of a cell, one of the four configured variants.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Red, Color::Green, Color::Blue, Color::Yellow];
}

/// One grid position: its current appearance plus how many turns remain
/// before it can be clicked again.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub shape: Shape,
    pub color: Color,
    pub cooldown: u32,
}

impl Cell {
    /// Build a fresh, clickable cell. Shape and color are enums, so an
    /// invalid cell is unrepresentable.
    pub fn new(shape: Shape, color: Color) -> Self {
        Cell {
            shape,
            color,
            cooldown: 0,
        }
    }
}

/// The authoritative grid, addressed as board[row][col].
pub type Board = Vec<Vec<Cell>>;

/// In-bounds 4-directional neighbors of (row, col).
pub fn neighbors(config: &GameConfig, row: usize, col: usize) -> Vec<(usize, usize)> {
    let mut result = Vec::with_capacity(4);
    if row > 0 {
        result.push((row - 1, col));
    }
    if row + 1 < config.rows {
        result.push((row + 1, col));
    }
    if col > 0 {
        result.push((row, col - 1));
    }
    if col + 1 < config.cols {
        result.push((row, col + 1));
    }
    result
}

/// All (shape, color) pairs that may legally replace the cell at (row, col):
/// both components must differ from the cell's current pair, and neither may
/// match any 4-adjacent neighbor's shape or color.
pub fn legal_replacement_pairs(
    board: &Board,
    config: &GameConfig,
    row: usize,
    col: usize,
) -> Vec<(Shape, Color)> {
    let current = board[row][col];
    let adjacent = neighbors(config, row, col);
    let mut pairs = Vec::new();
    for &shape in &config.shapes {
        if shape == current.shape {
            continue;
        }
        for &color in &config.colors {
            if color == current.color {
                continue;
            }
            let collides = adjacent.iter().any(|&(r, c)| {
                let nb = board[r][c];
                nb.shape == shape || nb.color == color
            });
            if !collides {
                pairs.push((shape, color));
            }
        }
    }
    pairs
}

/// Generate an initial board where no two 4-adjacent cells share shape or
/// color. Retries whole grids up to `max_attempts` times; if every attempt
/// dies, falls back to the degenerate all-default board rather than erroring.
pub fn generate_board(config: &GameConfig, rng: &mut StdRng) -> Board {
    for _ in 0..config.max_attempts {
        if let Some(board) = try_build(config, rng) {
            return board;
        }
    }
    warn!(
        "Board generation exhausted {} attempts; using fallback board",
        config.max_attempts
    );
    default_board(config)
}

fn default_board(config: &GameConfig) -> Board {
    let cell = Cell::new(config.shapes[0], config.colors[0]);
    vec![vec![cell; config.cols]; config.rows]
}

/// One generation attempt: fill cells in row-major order, abandoning the
/// whole grid as soon as any cell has no valid placement. No backtracking;
/// restarting is cheap with 16 combinations and fill-time degree <= 2.
fn try_build(config: &GameConfig, rng: &mut StdRng) -> Option<Board> {
    let mut board = default_board(config);
    for row in 0..config.rows {
        for col in 0..config.cols {
            board[row][col] = place_random_valid_cell(&board, config, row, col, rng)?;
        }
    }
    Some(board)
}

/// Shuffle the full shape x color bag and take the first candidate that does
/// not collide with an already-filled neighbor. Under row-major fill only the
/// cells above and to the left are filled, so only those two are checked.
fn place_random_valid_cell(
    board: &Board,
    config: &GameConfig,
    row: usize,
    col: usize,
    rng: &mut StdRng,
) -> Option<Cell> {
    let mut combos: Vec<(Shape, Color)> = Vec::with_capacity(config.shapes.len() * config.colors.len());
    for &shape in &config.shapes {
        for &color in &config.colors {
            combos.push((shape, color));
        }
    }
    combos.shuffle(rng);

    combos
        .into_iter()
        .find(|&(shape, color)| placement_ok(board, row, col, shape, color))
        .map(|(shape, color)| Cell::new(shape, color))
}

fn placement_ok(board: &Board, row: usize, col: usize, shape: Shape, color: Color) -> bool {
    if row > 0 {
        let up = board[row - 1][col];
        if up.shape == shape || up.color == color {
            return false;
        }
    }
    if col > 0 {
        let left = board[row][col - 1];
        if left.shape == shape || left.color == color {
            return false;
        }
    }
    true
}

#[cfg(test)]
pub(crate) fn assert_adjacency_invariant(board: &Board, config: &GameConfig) {
    for row in 0..config.rows {
        for col in 0..config.cols {
            for (r, c) in neighbors(config, row, col) {
                assert_ne!(
                    board[row][col].shape, board[r][c].shape,
                    "adjacent cells ({},{}) and ({},{}) share a shape",
                    row, col, r, c
                );
                assert_ne!(
                    board[row][col].color, board[r][c].color,
                    "adjacent cells ({},{}) and ({},{}) share a color",
                    row, col, r, c
                );
            }
        }
    }
}
