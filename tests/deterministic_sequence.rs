use std::cell::RefCell;
use std::rc::Rc;

use snake_rules::config::{GameConfig, GridSize};
use snake_rules::game::{EndReason, GameEngine, GameEvent, GameStatus};
use snake_rules::input::{Direction, KEY_DOWN, KEY_UP};
use snake_rules::score::{PersistenceError, Score, ScoreSink};
use snake_rules::tile::Tile;

#[derive(Clone, Default)]
struct SharedSink(Rc<RefCell<Vec<Score>>>);

impl ScoreSink for SharedSink {
    fn persist_score(&mut self, score: &Score) -> Result<(), PersistenceError> {
        self.0.borrow_mut().push(score.clone());
        Ok(())
    }
}

fn config() -> GameConfig {
    GameConfig {
        grid: GridSize {
            width: 12,
            height: 8,
        },
        ..GameConfig::default()
    }
}

#[test]
fn same_seed_replays_the_same_board() {
    let mut first = GameEngine::new_with_seed("ada", config(), Box::new(SharedSink::default()), 42)
        .expect("config is valid");
    let mut second = GameEngine::new_with_seed("ada", config(), Box::new(SharedSink::default()), 42)
        .expect("config is valid");
    first.init_game(0).expect("board has room");
    second.init_game(0).expect("board has room");

    for step in 0..20 {
        if step == 3 {
            let _ = first.set_direction(KEY_UP);
            let _ = second.set_direction(KEY_UP);
        }
        assert_eq!(first.prepare_next_move(), second.prepare_next_move());
        assert_eq!(first.snapshot(), second.snapshot());
    }
}

#[test]
fn stepwise_run_into_the_wall() {
    let sink = SharedSink::default();
    let mut engine = GameEngine::new_with_seed("ada", config(), Box::new(sink.clone()), 7)
        .expect("config is valid");
    engine.init_game(15).expect("board has room");

    // Default layout: three cells heading right along the middle row.
    let start = engine.snake_state();
    assert_eq!(start.direction, Direction::Right);
    assert_eq!(start.segments.len(), 3);
    assert_eq!(start.segments[0], Tile::new(3, 4));

    engine.prepare_next_move();
    assert_eq!(engine.set_direction(KEY_DOWN), Ok(true));
    assert_eq!(engine.set_direction(KEY_UP), Ok(false));

    let mut ticks = 1;
    while engine.is_in_game() {
        engine.prepare_next_move();
        ticks += 1;
        assert!(ticks < 20, "the snake must reach the bottom wall");
    }

    assert_eq!(engine.status(), GameStatus::GameOver);
    assert_eq!(engine.end_reason(), Some(EndReason::WallCollision));
    let final_state = engine.snake_state();
    assert_eq!(final_state.segments[0].y, 8);

    let saved = sink.0.borrow();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].player_name(), "ada");
    assert_eq!(saved[0].score(), final_state.score);
    assert!(final_state.score >= 15);
}

#[test]
fn game_over_event_carries_final_score() {
    let mut engine = GameEngine::new_with_seed("ada", config(), Box::new(SharedSink::default()), 3)
        .expect("config is valid");
    engine.init_game(0).expect("board has room");

    let mut last_events = Vec::new();
    while engine.is_in_game() {
        last_events = engine.prepare_next_move();
    }

    assert_eq!(
        last_events.last(),
        Some(&GameEvent::GameOver {
            reason: EndReason::WallCollision,
            score: engine.snake_state().score,
        })
    );
}
