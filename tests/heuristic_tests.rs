//! Heuristic Oracle Tests
//!
//! Cost terms (pip distance, self/opponent hits, head-on danger) and the
//! straight-first tie-break order.

use snake_duel::config::Config;
use snake_duel::heuristic::Heuristic;
use snake_duel::types::{Dims, Direction, GameState, Snake, SnakeId};

fn snake(cells: &[(i32, i32)], direction: Direction) -> Snake {
    Snake::new(cells.iter().map(|&c| c.into()).collect(), direction)
}

fn duel(snake1: Snake, snake2: Snake, pip: (i32, i32), owner: SnakeId) -> GameState {
    GameState {
        dims: Dims::new(11, 11),
        snake1,
        snake2,
        pip: pip.into(),
        last_pip_owner: owner,
    }
}

fn heuristic() -> Heuristic {
    Heuristic::new(Config::default_hardcoded().heuristic)
}

#[test]
fn test_moves_toward_pip() {
    let state = duel(
        snake(&[(5, 5), (4, 5), (3, 5)], Direction::Right),
        snake(&[(1, 9), (2, 9), (3, 9)], Direction::Left),
        (5, 1),
        SnakeId::One,
    );

    assert_eq!(heuristic().choose_move(&state, SnakeId::One), Direction::Up);
}

#[test]
fn test_straight_wins_ties() {
    // Pip directly behind: every candidate is equally far
    let state = duel(
        snake(&[(5, 5), (5, 6), (5, 7)], Direction::Up),
        snake(&[(0, 0), (1, 0), (2, 0)], Direction::Left),
        (5, 9),
        SnakeId::One,
    );
    let h = heuristic();

    assert_eq!(h.score_move(&state, SnakeId::One, Direction::Up), 5);
    assert_eq!(h.score_move(&state, SnakeId::One, Direction::Left), 5);
    assert_eq!(h.score_move(&state, SnakeId::One, Direction::Right), 5);
    assert_eq!(h.choose_move(&state, SnakeId::One), Direction::Up);
}

#[test]
fn test_turn_order_breaks_remaining_ties() {
    // Straight is blocked by the opponent; down and up tie, down is listed first
    let state = duel(
        snake(&[(5, 5), (4, 5), (3, 5)], Direction::Right),
        snake(&[(6, 4), (6, 5), (6, 6)], Direction::Up),
        (9, 5),
        SnakeId::One,
    );
    let h = heuristic();

    assert_eq!(h.score_move(&state, SnakeId::One, Direction::Right), 1000 + 3);
    assert_eq!(h.choose_move(&state, SnakeId::One), Direction::Down);
}

#[test]
fn test_self_hit_penalty() {
    let state = duel(
        snake(
            &[(2, 2), (2, 3), (3, 3), (3, 2), (3, 1)],
            Direction::Up,
        ),
        snake(&[(8, 8), (9, 8), (10, 8)], Direction::Left),
        (4, 2),
        SnakeId::One,
    );
    let h = heuristic();

    // (3, 2) is a trailing segment: 10 for the hit plus distance 1
    assert_eq!(h.score_move(&state, SnakeId::One, Direction::Right), 11);
}

#[test]
fn test_danger_applies_only_without_priority() {
    let snake1 = snake(&[(5, 5), (4, 5), (3, 5)], Direction::Right);
    let snake2 = snake(&[(7, 5), (8, 5), (9, 5)], Direction::Left);
    let h = heuristic();

    let at_risk = duel(snake1.clone(), snake2.clone(), (0, 0), SnakeId::Two);
    let safe = duel(snake1, snake2, (0, 0), SnakeId::One);

    let risky_cost = h.score_move(&at_risk, SnakeId::One, Direction::Right);
    let safe_cost = h.score_move(&safe, SnakeId::One, Direction::Right);
    assert_eq!(risky_cost - safe_cost, 100);
}

#[test]
fn test_distance_is_not_wrapped() {
    // Across the wrap (2, 5) is only 3 columns from x = 10
    let state = duel(
        snake(&[(1, 5), (0, 5), (10, 5)], Direction::Right),
        snake(&[(5, 9), (6, 9), (7, 9)], Direction::Left),
        (10, 1),
        SnakeId::One,
    );

    assert_eq!(heuristic().score_move(&state, SnakeId::One, Direction::Right), 8 + 4);
}

#[test]
fn test_choose_respects_candidate_subset() {
    let state = duel(
        snake(&[(5, 5), (4, 5), (3, 5)], Direction::Right),
        snake(&[(1, 9), (2, 9), (3, 9)], Direction::Left),
        (5, 1),
        SnakeId::One,
    );
    let h = heuristic();

    assert_eq!(
        h.choose(&state, SnakeId::One, &[Direction::Right, Direction::Down]),
        Direction::Right
    );
    assert_eq!(h.choose(&state, SnakeId::One, &[]), Direction::Right);
}

#[test]
fn test_scores_snake_two_from_its_own_view() {
    let state = duel(
        snake(&[(1, 9), (2, 9), (3, 9)], Direction::Left),
        snake(&[(5, 5), (5, 6), (5, 7)], Direction::Up),
        (8, 5),
        SnakeId::Two,
    );

    assert_eq!(heuristic().choose_move(&state, SnakeId::Two), Direction::Right);
}
