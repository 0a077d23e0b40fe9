/// Per-tick state transition.
///
/// One call advances the snake by exactly one cell in the current
/// direction. Collisions are detected *before* any mutation: a Collided
/// result leaves the snake, food and score exactly as they were, so the
/// renderer can still show the final board.
///
/// Tail rule: when the move does not eat, the tail cell is vacated in
/// the same step, so moving the head into the current tail cell is
/// legal. The tail segment is only part of the self-collision scan when
/// this step eats food (the tail stays put on growth).

use crate::sim::world::WorldState;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StepResult {
    /// Normal move: head advanced, tail vacated, length unchanged.
    Continued,
    /// Head landed on food: snake grew by one, score incremented,
    /// food respawned (unless the board is now full — `world.won`).
    Ate,
    /// Head hit a wall or the body. State not mutated; the caller
    /// must transition to GameOver.
    Collided,
}

pub fn step(world: &mut WorldState) -> StepResult {
    let new_head = world.grid.neighbor(world.head(), world.direction);

    if !world.grid.contains(new_head) {
        return StepResult::Collided;
    }

    let eating = new_head == world.food;
    let tail_idx = world.snake.len() - 1;
    let hits_body = world
        .snake
        .iter()
        .enumerate()
        .any(|(i, &cell)| cell == new_head && (eating || i != tail_idx));
    if hits_body {
        return StepResult::Collided;
    }

    world.snake.push_front(new_head);

    if eating {
        world.score += 1;
        if !world.spawn_food() {
            world.won = true;
        }
        StepResult::Ate
    } else {
        world.snake.pop_back();
        StepResult::Continued
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::direction::Direction;
    use crate::domain::grid::{Cell, Grid};

    /// World on a 10×10 grid with a hand-placed snake (head first)
    /// and food parked off the snake's path.
    fn world_with(snake: &[Cell], dir: Direction, food: Cell) -> WorldState {
        let mut w = WorldState::with_seed(Grid::new(10, 10), 1);
        w.snake = snake.iter().copied().collect();
        w.direction = dir;
        w.food = food;
        w
    }

    fn body(w: &WorldState) -> Vec<Cell> {
        w.snake.iter().copied().collect()
    }

    #[test]
    fn plain_move_keeps_length() {
        let mut w = world_with(&[(5, 5), (4, 5), (3, 5)], Direction::Right, (9, 9));
        assert_eq!(step(&mut w), StepResult::Continued);
        assert_eq!(body(&w), vec![(6, 5), (5, 5), (4, 5)]);
        assert_eq!(w.score, 0);
    }

    #[test]
    fn eating_grows_scores_and_respawns() {
        let mut w = world_with(&[(5, 5), (4, 5), (3, 5)], Direction::Right, (6, 5));
        assert_eq!(step(&mut w), StepResult::Ate);
        assert_eq!(body(&w), vec![(6, 5), (5, 5), (4, 5), (3, 5)]);
        assert_eq!(w.score, 1);
        assert_ne!(w.food, (6, 5));
        assert!(!w.snake.contains(&w.food));
        assert!(w.grid.contains(w.food));
    }

    #[test]
    fn wall_hit_left_edge() {
        let mut w = world_with(&[(0, 5), (1, 5), (2, 5)], Direction::Left, (9, 9));
        assert_eq!(step(&mut w), StepResult::Collided);
        // No mutation on collision.
        assert_eq!(body(&w), vec![(0, 5), (1, 5), (2, 5)]);
        assert_eq!(w.score, 0);
    }

    #[test]
    fn wall_hit_every_edge() {
        let cases = [
            ((9, 5), Direction::Right),
            ((5, 0), Direction::Up),
            ((5, 9), Direction::Down),
        ];
        for (head, dir) in cases {
            let mut w = world_with(&[head], dir, (0, 0));
            assert_eq!(step(&mut w), StepResult::Collided, "heading {dir:?}");
        }
    }

    #[test]
    fn self_collision_into_neck_loop() {
        // Closed loop: head at (5,5), body curling back so that moving
        // Up runs into (5,4), the snake's own second segment.
        let snake = [(5, 5), (5, 4), (5, 3), (4, 3), (4, 4), (4, 5)];
        let mut w = world_with(&snake, Direction::Up, (9, 9));
        assert_eq!(step(&mut w), StepResult::Collided);
        assert_eq!(body(&w), snake.to_vec());
    }

    #[test]
    fn moving_into_vacated_tail_is_legal() {
        // 2×2 loop: the head chases the tail. The tail cell empties this
        // same step, so this is a Continued move, not a collision.
        let mut w = world_with(&[(4, 5), (4, 4), (5, 4), (5, 5)], Direction::Right, (9, 9));
        assert_eq!(step(&mut w), StepResult::Continued);
        assert_eq!(body(&w), vec![(5, 5), (4, 5), (4, 4), (5, 4)]);
    }

    #[test]
    fn tail_cell_is_deadly_when_eating() {
        // Same chase, but food sits on the destination: growth keeps the
        // tail in place, so the move is now a self-collision.
        let mut w = world_with(&[(4, 5), (4, 4), (5, 4), (5, 5)], Direction::Right, (5, 5));
        assert_eq!(step(&mut w), StepResult::Collided);
    }

    #[test]
    fn direction_change_applies_on_next_step_only() {
        let mut w = world_with(&[(5, 5), (4, 5), (3, 5)], Direction::Right, (9, 9));
        assert_eq!(step(&mut w), StepResult::Continued);
        w.set_direction(Direction::Down);
        assert_eq!(step(&mut w), StepResult::Continued);
        assert_eq!(w.head(), (6, 6));
    }

    #[test]
    fn winning_move_fills_the_board() {
        // 2×2 board, snake of 3; eating the last free cell fills it.
        let mut w = WorldState::with_seed(Grid::new(2, 2), 3);
        w.snake = [(0, 1), (0, 0), (1, 0)].into_iter().collect();
        w.direction = Direction::Right;
        w.food = (1, 1);
        assert_eq!(step(&mut w), StepResult::Ate);
        assert!(w.won);
        assert_eq!(w.snake.len(), 4);
    }

    #[test]
    fn long_run_never_duplicates_cells() {
        let mut w = WorldState::with_seed(Grid::new(10, 10), 11);
        w.start_game(std::time::Duration::from_millis(100));
        loop {
            match step(&mut w) {
                StepResult::Collided => break,
                _ => {
                    let mut seen = body(&w);
                    seen.sort_unstable();
                    seen.dedup();
                    assert_eq!(seen.len(), w.snake.len());
                }
            }
        }
    }
}
