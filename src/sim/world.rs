/// WorldState: the complete snapshot of a running game.
///
/// The snake is a deque, head at the front: advancing is an O(1)
/// `push_front` of the new head plus an O(1) `pop_back` of the tail.
/// While the game is alive the body never contains duplicates —
/// a move that would create one ends the game instead.
///
/// One WorldState lives for the whole process; `start_game` re-arms the
/// play-session fields (snake, direction, food, score) in place, so a
/// stale tick can never observe a half-built session.

use std::collections::VecDeque;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::direction::Direction;
use crate::domain::grid::{Cell, Grid};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Menu-selected game speed. Maps to an inter-tick delay via the
/// config speed table; latched into `tick_rate` when a game starts.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SpeedLevel {
    Slow,
    Medium,
    Fast,
}

impl SpeedLevel {
    pub fn label(self) -> &'static str {
        match self {
            SpeedLevel::Slow => "Slow",
            SpeedLevel::Medium => "Medium",
            SpeedLevel::Fast => "Fast",
        }
    }

    pub fn next(self) -> SpeedLevel {
        match self {
            SpeedLevel::Slow => SpeedLevel::Medium,
            SpeedLevel::Medium => SpeedLevel::Fast,
            SpeedLevel::Fast => SpeedLevel::Slow,
        }
    }

    pub fn prev(self) -> SpeedLevel {
        match self {
            SpeedLevel::Slow => SpeedLevel::Fast,
            SpeedLevel::Medium => SpeedLevel::Slow,
            SpeedLevel::Fast => SpeedLevel::Medium,
        }
    }
}

pub struct WorldState {
    // ── Board ──
    pub grid: Grid,

    // ── Play session (valid while phase != Menu) ──
    pub snake: VecDeque<Cell>,
    pub direction: Direction,
    pub food: Cell,
    pub score: u32,
    /// Set when the snake fills the board and no food cell remains.
    pub won: bool,

    // ── Meta ──
    pub phase: Phase,
    pub level: SpeedLevel,
    pub tick_rate: Duration,

    rng: StdRng,
}

/// Starting body, head first: three cells pointing Right.
const START_SNAKE: [Cell; 3] = [(5, 5), (4, 5), (3, 5)];

impl WorldState {
    pub fn new(grid: Grid) -> Self {
        Self::with_rng(grid, StdRng::from_entropy())
    }

    /// Deterministic world for tests.
    #[cfg(test)]
    pub fn with_seed(grid: Grid, seed: u64) -> Self {
        Self::with_rng(grid, StdRng::seed_from_u64(seed))
    }

    fn with_rng(grid: Grid, rng: StdRng) -> Self {
        WorldState {
            grid,
            snake: VecDeque::new(),
            direction: Direction::Right,
            food: (0, 0),
            score: 0,
            won: false,
            phase: Phase::Menu,
            level: SpeedLevel::Medium,
            tick_rate: Duration::from_millis(120),
            rng,
        }
    }

    /// Begin a fresh play session at the given tick rate.
    /// The previous session's snake/food/score are discarded.
    pub fn start_game(&mut self, tick_rate: Duration) {
        self.snake = START_SNAKE.into_iter().collect();
        self.direction = Direction::Right;
        self.score = 0;
        self.won = false;
        self.tick_rate = tick_rate;
        self.spawn_food();
        self.phase = Phase::Playing;
    }

    pub fn head(&self) -> Cell {
        // The body is non-empty for the entire play session.
        self.snake[0]
    }

    /// Request a direction change for the next step. A reversal into the
    /// snake's own neck is silently ignored; anything else takes effect
    /// on the following tick, never retroactively.
    pub fn set_direction(&mut self, requested: Direction) {
        if requested != self.direction.opposite() {
            self.direction = requested;
        }
    }

    /// Place food on a uniformly random cell not occupied by the snake.
    /// Returns false when the snake covers the whole grid, i.e. there is
    /// nowhere left to spawn and the player has won.
    pub fn spawn_food(&mut self) -> bool {
        if self.snake.len() >= self.grid.area() {
            return false;
        }
        // Rejection sampling: terminates because at least one cell is free.
        loop {
            let cell = (
                self.rng.gen_range(0..self.grid.cols),
                self.rng.gen_range(0..self.grid.rows),
            );
            if !self.snake.contains(&cell) {
                self.food = cell;
                return true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> WorldState {
        WorldState::with_seed(Grid::new(10, 10), 7)
    }

    #[test]
    fn start_game_resets_session() {
        let mut w = world();
        w.score = 42;
        w.start_game(Duration::from_millis(70));
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.score, 0);
        assert_eq!(w.direction, Direction::Right);
        assert_eq!(Vec::from(w.snake.clone()), vec![(5, 5), (4, 5), (3, 5)]);
        assert_eq!(w.tick_rate, Duration::from_millis(70));
        assert!(!w.snake.contains(&w.food));
    }

    #[test]
    fn reversal_is_ignored() {
        let mut w = world();
        w.start_game(Duration::from_millis(100));
        assert_eq!(w.direction, Direction::Right);
        w.set_direction(Direction::Left);
        assert_eq!(w.direction, Direction::Right);
        w.set_direction(Direction::Up);
        assert_eq!(w.direction, Direction::Up);
        w.set_direction(Direction::Down);
        assert_eq!(w.direction, Direction::Up);
    }

    #[test]
    fn food_never_spawns_on_the_body() {
        let mut w = WorldState::with_seed(Grid::new(4, 4), 99);
        // Fill most of the board so rejection actually has to retry.
        w.snake = (0..4)
            .flat_map(|y| (0..4).map(move |x| (x, y)))
            .take(14)
            .collect();
        for _ in 0..50 {
            assert!(w.spawn_food());
            assert!(!w.snake.contains(&w.food));
            assert!(w.grid.contains(w.food));
        }
    }

    #[test]
    fn full_board_means_no_spawn() {
        let mut w = WorldState::with_seed(Grid::new(3, 3), 5);
        w.snake = (0..3).flat_map(|y| (0..3).map(move |x| (x, y))).collect();
        assert!(!w.spawn_food());
    }

    #[test]
    fn speed_levels_cycle_both_ways() {
        let mut lvl = SpeedLevel::Slow;
        for _ in 0..3 {
            lvl = lvl.next();
        }
        assert_eq!(lvl, SpeedLevel::Slow);
        assert_eq!(SpeedLevel::Medium.prev(), SpeedLevel::Slow);
        assert_eq!(SpeedLevel::Slow.prev(), SpeedLevel::Fast);
    }
}
