use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::config::GameConfig;
use crate::difficulty::Difficulty;
use crate::error::GameError;
use crate::input::{direction_change_is_valid, Direction, InputError};
use crate::item::{Item, ItemKind};
use crate::score::{Score, ScoreSink};
use crate::snake::Snake;
use crate::tile::{random_free_tile, PlacementError, Tile};

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum GameStatus {
    /// Board is laid out but nothing moves until `init_game`.
    NotStarted,
    InGame,
    GameOver,
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum EndReason {
    WallCollision,
    SelfCollision,
    /// The snake fills the board and the apple has nowhere to go.
    BoardFull,
}

/// Something that happened during one tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameEvent {
    ItemConsumed { kind: ItemKind, tile: Tile },
    AppleRelocated { tile: Tile },
    BonusSpawned { kind: ItemKind, tile: Tile },
    BonusEvicted { kind: ItemKind, tile: Tile },
    GameOver { reason: EndReason, score: u32 },
}

/// Read-only copy of the snake for renderers.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct SnakeSnapshot {
    pub segments: Vec<Tile>,
    pub direction: Direction,
    pub score: u32,
    pub alive: bool,
}

/// Read-only copy of the whole board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub player_name: String,
    pub status: GameStatus,
    pub end_reason: Option<EndReason>,
    pub difficulty: Difficulty,
    pub snake: SnakeSnapshot,
    pub items: Vec<Item>,
}

/// One player's session: the snake, the items on the board and the
/// tick-by-tick rules that move them.
///
/// The apple always sits at index 0 of the item list; bonus items follow in
/// spawn order, so index 1 is the oldest bonus.
pub struct GameEngine {
    player_name: String,
    config: GameConfig,
    difficulty: Difficulty,
    snake: Snake,
    items: Vec<Item>,
    cycle_counter: u32,
    able_to_set_direction: bool,
    status: GameStatus,
    end_reason: Option<EndReason>,
    score_saved: bool,
    rng: StdRng,
    score_sink: Box<dyn ScoreSink>,
}

impl GameEngine {
    /// Creates a session seeded from system entropy.
    pub fn new(
        player_name: impl Into<String>,
        config: GameConfig,
        score_sink: Box<dyn ScoreSink>,
    ) -> Result<Self, GameError> {
        Self::with_rng(player_name, config, score_sink, StdRng::from_entropy())
    }

    /// Creates a deterministic session for tests and reproducible runs.
    pub fn new_with_seed(
        player_name: impl Into<String>,
        config: GameConfig,
        score_sink: Box<dyn ScoreSink>,
        seed: u64,
    ) -> Result<Self, GameError> {
        Self::with_rng(player_name, config, score_sink, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        player_name: impl Into<String>,
        config: GameConfig,
        score_sink: Box<dyn ScoreSink>,
        rng: StdRng,
    ) -> Result<Self, GameError> {
        config.validate()?;

        let snake = starting_snake(&config, 0);
        let mut engine = Self {
            player_name: player_name.into(),
            difficulty: config.starting_difficulty,
            config,
            snake,
            items: Vec::new(),
            cycle_counter: 0,
            able_to_set_direction: false,
            status: GameStatus::NotStarted,
            end_reason: None,
            score_saved: false,
            rng,
            score_sink,
        };
        engine.reset_board(0)?;

        Ok(engine)
    }

    /// Starts a fresh run whose score begins at `baseline_score`.
    ///
    /// Difficulty is kept, so a driver can carry the score of a finished
    /// level into the next one.
    pub fn init_game(&mut self, baseline_score: u32) -> Result<(), PlacementError> {
        self.reset_board(baseline_score)?;
        self.status = GameStatus::InGame;
        info!(
            "{} starts a run at {} with score {}",
            self.player_name, self.difficulty, baseline_score
        );
        Ok(())
    }

    fn reset_board(&mut self, baseline_score: u32) -> Result<(), PlacementError> {
        // Place the apple before touching the current board so a failure
        // leaves the session as it was.
        let snake = starting_snake(&self.config, baseline_score);
        let apple_tile = random_free_tile(&mut self.rng, self.config.grid, &snake, &[])?;

        self.snake = snake;
        self.items.clear();
        self.items.push(Item::apple(apple_tile));

        self.cycle_counter = 0;
        self.able_to_set_direction = false;
        self.end_reason = None;
        self.score_saved = false;
        Ok(())
    }

    /// Advances the session by one tick and returns what happened.
    ///
    /// Does nothing outside `InGame`. Items under the head are eaten before
    /// collisions are checked, and the snake only moves when the run
    /// survives the check.
    pub fn prepare_next_move(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.status != GameStatus::InGame {
            return events;
        }

        self.consume_items(&mut events);
        if self.status != GameStatus::InGame {
            return events;
        }

        if let Some(reason) = self.collision() {
            self.end_game(reason, &mut events);
            return events;
        }

        self.snake.move_forward();
        self.able_to_set_direction = true;

        self.cycle_counter += 1;
        if self.cycle_counter % self.config.bonus_spawn_cycle == 0 {
            self.spawn_bonus(&mut events);
            // Restart at 1, not 0, so the counter never grows unbounded.
            self.cycle_counter = 1;
        }

        events
    }

    fn consume_items(&mut self, events: &mut Vec<GameEvent>) {
        let head = self.snake.head();
        let mut index = 0;

        while index < self.items.len() {
            let item = self.items[index];
            if item.tile != head {
                index += 1;
                continue;
            }

            self.snake.consume(item.kind, self.difficulty);
            events.push(GameEvent::ItemConsumed {
                kind: item.kind,
                tile: item.tile,
            });

            if !item.is_primary() {
                self.items.remove(index);
                continue;
            }

            match random_free_tile(&mut self.rng, self.config.grid, &self.snake, &self.items) {
                Ok(tile) => {
                    self.items[index].tile = tile;
                    events.push(GameEvent::AppleRelocated { tile });
                    index += 1;
                }
                Err(error) => {
                    warn!("cannot relocate apple: {error}");
                    self.end_game(EndReason::BoardFull, events);
                    return;
                }
            }
        }
    }

    fn collision(&self) -> Option<EndReason> {
        if !self.snake.is_alive() {
            return Some(EndReason::SelfCollision);
        }
        if !self.snake.head().is_within_bounds(self.config.grid) {
            return Some(EndReason::WallCollision);
        }
        None
    }

    fn spawn_bonus(&mut self, events: &mut Vec<GameEvent>) {
        let capacity = self.difficulty.max_bonus_items();
        if capacity == 0 {
            return;
        }

        let tile = match random_free_tile(&mut self.rng, self.config.grid, &self.snake, &self.items)
        {
            Ok(tile) => tile,
            Err(error) => {
                debug!("skipping bonus spawn: {error}");
                return;
            }
        };

        while self.bonus_count() >= capacity {
            let evicted = self.items.remove(1);
            events.push(GameEvent::BonusEvicted {
                kind: evicted.kind,
                tile: evicted.tile,
            });
        }

        let kind = ItemKind::random_bonus(&mut self.rng, self.config.poisoned_apple_chance);
        self.items.push(Item::new(kind, tile));
        events.push(GameEvent::BonusSpawned { kind, tile });
        debug!("spawned {kind:?} at ({}, {})", tile.x, tile.y);
    }

    fn end_game(&mut self, reason: EndReason, events: &mut Vec<GameEvent>) {
        self.status = GameStatus::GameOver;
        self.end_reason = Some(reason);
        let score = self.snake.score();
        events.push(GameEvent::GameOver { reason, score });
        info!(
            "{}'s run ended by {reason:?} with score {score}",
            self.player_name
        );

        self.save_score();
    }

    /// Requests a turn using a raw key code.
    ///
    /// Returns `Ok(true)` when the turn was committed and `Ok(false)` when
    /// the session is not accepting turns right now (not in game, or a turn
    /// was already committed this tick). Unknown keys and turns along the
    /// current axis come back as `Err` and leave the state untouched.
    pub fn set_direction(&mut self, key_code: i32) -> Result<bool, InputError> {
        if self.status != GameStatus::InGame || !self.able_to_set_direction {
            debug!("ignoring key {key_code}: no turn allowed right now");
            return Ok(false);
        }

        let requested = Direction::from_key_code(key_code).inspect_err(|error| {
            debug!("ignoring key: {error}");
        })?;

        let current = self.snake.direction();
        if !direction_change_is_valid(current, requested) {
            let error = InputError::SameAxis { current, requested };
            debug!("ignoring key: {error}");
            return Err(error);
        }

        self.snake.set_direction(requested);
        self.able_to_set_direction = false;
        Ok(true)
    }

    /// Returns true when the snake has reached the current level's length
    /// and a higher level exists.
    #[must_use]
    pub fn able_to_upgrade_difficulty_level(&self) -> bool {
        !self.difficulty.is_max_level()
            && self.snake.starter_length() >= self.difficulty.level_length()
    }

    /// Moves to the next difficulty level if allowed. Returns whether it did.
    pub fn upgrade_difficulty_level(&mut self) -> bool {
        if !self.able_to_upgrade_difficulty_level() {
            return false;
        }

        let previous = self.difficulty;
        self.difficulty = previous.next_level();
        info!(
            "{} moves up from {previous} to {}",
            self.player_name, self.difficulty
        );
        true
    }

    /// Hands the final score of a finished run to the score sink.
    ///
    /// Does nothing until the run is over. Only positive scores are saved
    /// and each run is saved at most once. A failed save is logged and may
    /// be retried by calling this again.
    pub fn save_score(&mut self) {
        let score = self.snake.score();
        if self.status != GameStatus::GameOver || score == 0 || self.score_saved {
            return;
        }

        let record = Score::new(self.player_name.clone(), score);
        match self.score_sink.persist_score(&record) {
            Ok(()) => {
                self.score_saved = true;
                debug!("saved score {score} for {}", self.player_name);
            }
            Err(error) => warn!("failed to save score {score}: {error}"),
        }
    }

    #[must_use]
    pub fn is_in_game(&self) -> bool {
        self.status == GameStatus::InGame
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only view of the snake.
    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn snake_state(&self) -> SnakeSnapshot {
        SnakeSnapshot {
            segments: self.snake.segments().copied().collect(),
            direction: self.snake.direction(),
            score: self.snake.score(),
            alive: self.snake.is_alive(),
        }
    }

    /// Copy of the items on the board, apple first.
    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        self.items.clone()
    }

    #[must_use]
    pub fn apple(&self) -> Item {
        self.items[0]
    }

    #[must_use]
    pub fn bonus_count(&self) -> usize {
        self.items.len().saturating_sub(1)
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            player_name: self.player_name.clone(),
            status: self.status,
            end_reason: self.end_reason,
            difficulty: self.difficulty,
            snake: self.snake_state(),
            items: self.items(),
        }
    }
}

/// Lays out a fresh snake heading right along the middle row.
fn starting_snake(config: &GameConfig, score: u32) -> Snake {
    let length = config.initial_snake_length;
    let width = usize::from(config.grid.width);
    let head_x = (length - 1).max(width / 4);
    let head = Tile::new(
        i32::try_from(head_x).unwrap_or(0),
        i32::from(config.grid.height / 2),
    );

    Snake::new(head, Direction::Right, length, score)
}
