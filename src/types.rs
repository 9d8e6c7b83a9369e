// Snake duel game types
// Positions, directions and the immutable-at-rest game state shared by every module

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::config::Config;
use crate::pip::PipSource;

/// 2D cell coordinate on the toroidal grid (origin top-left)
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Plain (non-wrapped) Manhattan distance
    pub fn manhattan(&self, other: &Position) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }
}

/// Grid dimensions; every movement wraps modulo these
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy)]
pub struct Dims {
    pub width: i32,
    pub height: i32,
}

impl Dims {
    pub fn new(width: i32, height: i32) -> Self {
        Dims { width, height }
    }

    pub fn wrap(&self, pos: Position) -> Position {
        Position {
            x: pos.x.rem_euclid(self.width),
            y: pos.y.rem_euclid(self.height),
        }
    }

    /// Iterates every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position { x, y }))
    }
}

/// The four movement directions
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all possible directions
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Parses a direction name; anything unrecognised means "no change requested"
    pub fn parse(s: &str) -> Option<Direction> {
        match s.trim().to_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Straight ahead first, then the two perpendicular turns.
    /// The order is the tie-break order used by the heuristic.
    pub fn candidates(&self) -> [Direction; 3] {
        match self {
            Direction::Left => [Direction::Left, Direction::Up, Direction::Down],
            Direction::Right => [Direction::Right, Direction::Down, Direction::Up],
            Direction::Up => [Direction::Up, Direction::Left, Direction::Right],
            Direction::Down => [Direction::Down, Direction::Right, Direction::Left],
        }
    }

    /// Next cell when moving in this direction, wrapped onto the grid
    pub fn apply(&self, pos: &Position, dims: &Dims) -> Position {
        let next = match self {
            Direction::Up => Position { x: pos.x, y: pos.y - 1 },
            Direction::Down => Position { x: pos.x, y: pos.y + 1 },
            Direction::Left => Position { x: pos.x - 1, y: pos.y },
            Direction::Right => Position { x: pos.x + 1, y: pos.y },
        };
        dims.wrap(next)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifies one of the two players
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnakeId {
    One,
    Two,
}

impl SnakeId {
    pub fn opponent(&self) -> SnakeId {
        match self {
            SnakeId::One => SnakeId::Two,
            SnakeId::Two => SnakeId::One,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            SnakeId::One => 0,
            SnakeId::Two => 1,
        }
    }
}

impl fmt::Display for SnakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnakeId::One => write!(f, "snake 1"),
            SnakeId::Two => write!(f, "snake 2"),
        }
    }
}

/// One snake: ordered body (head first) plus heading
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    pub body: VecDeque<Position>,
    pub direction: Direction,
    pub pending_direction: Direction,
}

impl Snake {
    /// Builds a snake from explicit body cells, head first.
    ///
    /// # Panics
    /// If `body` is empty; every snake has at least a head.
    pub fn new(body: Vec<Position>, direction: Direction) -> Self {
        assert!(!body.is_empty(), "snake body must contain at least the head");
        Snake {
            body: body.into(),
            direction,
            pending_direction: direction,
        }
    }

    /// Lays out a straight body trailing behind `head`, opposite to `direction`.
    /// A `length` of 0 still places the head.
    pub fn spawn(head: Position, direction: Direction, length: usize, dims: &Dims) -> Self {
        let behind = direction.opposite();
        let mut body = VecDeque::with_capacity(length);
        let mut cell = dims.wrap(head);
        for _ in 0..length.max(1) {
            body.push_back(cell);
            cell = behind.apply(&cell, dims);
        }
        Snake {
            body,
            direction,
            pending_direction: direction,
        }
    }

    /// First body cell. Bodies are non-empty from `new`/`spawn` on and the
    /// resolver never cuts the head.
    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Records the direction for the next tick. Reversals are silently ignored.
    pub fn request(&mut self, direction: Direction) {
        if direction != self.direction.opposite() {
            self.pending_direction = direction;
        }
    }

    /// Whether `pos` is anywhere on the body, head included
    pub fn occupies(&self, pos: &Position) -> bool {
        self.body.contains(pos)
    }

    /// Index of `pos` among the trailing segments (head excluded)
    pub fn trailing_index(&self, pos: &Position) -> Option<usize> {
        self.body.iter().skip(1).position(|c| c == pos).map(|i| i + 1)
    }
}

/// Complete snapshot of a duel between two snakes
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub dims: Dims,
    pub snake1: Snake,
    pub snake2: Snake,
    pub pip: Position,
    pub last_pip_owner: SnakeId,
}

impl GameState {
    /// Starting position for a match, with the first pip drawn from `pips`
    pub fn new(config: &Config, pips: &mut dyn PipSource) -> Self {
        let dims = Dims::new(config.board.width, config.board.height);
        let snakes = &config.snakes;
        let snake1 = Snake::spawn(
            snakes.snake1_start.into(),
            snakes.snake1_direction,
            snakes.initial_length,
            &dims,
        );
        let snake2 = Snake::spawn(
            snakes.snake2_start.into(),
            snakes.snake2_direction,
            snakes.initial_length,
            &dims,
        );

        let mut state = GameState {
            dims,
            snake1,
            snake2,
            pip: Position::new(0, 0),
            last_pip_owner: SnakeId::One,
        };
        let free = state.free_cells();
        state.pip = pips.place(&free).unwrap_or(state.pip);
        state
    }

    pub fn snake(&self, id: SnakeId) -> &Snake {
        match id {
            SnakeId::One => &self.snake1,
            SnakeId::Two => &self.snake2,
        }
    }

    pub fn snake_mut(&mut self, id: SnakeId) -> &mut Snake {
        match id {
            SnakeId::One => &mut self.snake1,
            SnakeId::Two => &mut self.snake2,
        }
    }

    /// Cells covered by neither body, row-major
    pub fn free_cells(&self) -> Vec<Position> {
        self.dims
            .cells()
            .filter(|c| !self.snake1.occupies(c) && !self.snake2.occupies(c))
            .collect()
    }

    pub fn lengths(&self) -> (usize, usize) {
        (self.snake1.len(), self.snake2.len())
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_wraps_around_edges() {
        let dims = Dims::new(11, 11);
        assert_eq!(Direction::Left.apply(&Position::new(0, 3), &dims), Position::new(10, 3));
        assert_eq!(Direction::Up.apply(&Position::new(4, 0), &dims), Position::new(4, 10));
        assert_eq!(Direction::Right.apply(&Position::new(10, 3), &dims), Position::new(0, 3));
        assert_eq!(Direction::Down.apply(&Position::new(4, 10), &dims), Position::new(4, 0));
    }

    #[test]
    fn test_request_ignores_reversal() {
        let mut snake = Snake::new(vec![(5, 5).into(), (6, 5).into()], Direction::Left);
        snake.request(Direction::Right);
        assert_eq!(snake.pending_direction, Direction::Left);
        snake.request(Direction::Up);
        assert_eq!(snake.pending_direction, Direction::Up);
        // Reversal is judged against the applied heading, not the pending one
        snake.request(Direction::Down);
        assert_eq!(snake.pending_direction, Direction::Down);
    }

    #[test]
    fn test_spawn_lays_body_behind_head() {
        let dims = Dims::new(31, 31);
        let snake = Snake::spawn((10, 10).into(), Direction::Right, 3, &dims);
        let body: Vec<Position> = snake.body.iter().copied().collect();
        assert_eq!(body, vec![(10, 10).into(), (9, 10).into(), (8, 10).into()]);
    }

    #[test]
    #[should_panic(expected = "at least the head")]
    fn test_empty_body_rejected() {
        let _ = Snake::new(Vec::new(), Direction::Up);
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!(Direction::parse("UP"), Some(Direction::Up));
        assert_eq!(Direction::parse(" left "), Some(Direction::Left));
        assert_eq!(Direction::parse("sideways"), None);
    }

    #[test]
    fn test_candidates_never_reverse() {
        for dir in Direction::all() {
            let candidates = dir.candidates();
            assert_eq!(candidates[0], dir, "straight ahead comes first");
            assert!(!candidates.contains(&dir.opposite()));
        }
    }

    #[test]
    fn test_trailing_index_skips_head() {
        let snake = Snake::new(
            vec![(1, 1).into(), (2, 1).into(), (3, 1).into()],
            Direction::Left,
        );
        assert_eq!(snake.trailing_index(&(1, 1).into()), None);
        assert_eq!(snake.trailing_index(&(3, 1).into()), Some(2));
    }
}
