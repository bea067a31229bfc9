use std::collections::VecDeque;

use crate::difficulty::Difficulty;
use crate::input::Direction;
use crate::item::ItemKind;
use crate::tile::Tile;

/// Shortest body a negative effect can leave behind.
pub const MIN_SNAKE_LENGTH: usize = 1;

/// Mutable snake state: body, heading, score and pending growth.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Tile>,
    direction: Direction,
    score: u32,
    pending_growth: usize,
    alive: bool,
}

impl Snake {
    /// Creates a straight snake of `length` segments with its head at `head`,
    /// the body trailing behind it opposite to `direction`.
    #[must_use]
    pub fn new(head: Tile, direction: Direction, length: usize, score: u32) -> Self {
        let length = length.max(MIN_SNAKE_LENGTH);
        let trailing = direction.opposite();

        let mut body = VecDeque::with_capacity(length);
        let mut segment = head;
        for _ in 0..length {
            body.push_back(segment);
            segment = segment.step(trailing);
        }

        Self {
            body,
            direction,
            score,
            pending_growth: 0,
            alive: true,
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics if `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Tile>, direction: Direction, score: u32) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");

        Self {
            body: VecDeque::from(segments),
            direction,
            score,
            pending_growth: 0,
            alive: true,
        }
    }

    /// Advances one cell in the current direction.
    ///
    /// The tail is kept while growth is pending. Running into the body marks
    /// the snake dead but leaves the new head in place for inspection.
    pub fn move_forward(&mut self) {
        let next_head = self.next_head_position();

        self.body.push_front(next_head);
        if self.pending_growth > 0 {
            self.pending_growth -= 1;
        } else {
            let _ = self.body.pop_back();
        }

        if self.head_overlaps_body() {
            self.alive = false;
        }
    }

    /// Returns the head position for the next movement tick.
    #[must_use]
    pub fn next_head_position(&self) -> Tile {
        self.head().step(self.direction)
    }

    /// Applies the effect of eating an item of `kind`.
    ///
    /// Score deltas scale with the difficulty's multiplier and saturate at
    /// zero. Growth lands one segment per move; shrinking first cancels
    /// pending growth and then drops tail segments down to the length floor.
    pub fn consume(&mut self, kind: ItemKind, difficulty: Difficulty) {
        let effect = kind.effect();

        let points = effect.score_delta.unsigned_abs() * difficulty.score_multiplier();
        self.score = if effect.score_delta >= 0 {
            self.score.saturating_add(points)
        } else {
            self.score.saturating_sub(points)
        };

        let length_change = effect.length_delta.unsigned_abs() as usize;
        if effect.length_delta >= 0 {
            self.pending_growth += length_change;
        } else {
            self.shrink(length_change);
        }
    }

    fn shrink(&mut self, segments: usize) {
        let cancelled = segments.min(self.pending_growth);
        self.pending_growth -= cancelled;

        for _ in cancelled..segments {
            if self.body.len() <= MIN_SNAKE_LENGTH {
                break;
            }
            let _ = self.body.pop_back();
        }
    }

    /// Overwrites the heading. Turn legality is checked by the engine.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Tile {
        // The body never drops below MIN_SNAKE_LENGTH segments.
        self.body[0]
    }

    /// Returns true if any segment occupies `tile`.
    #[must_use]
    pub fn occupies(&self, tile: Tile) -> bool {
        self.body.contains(&tile)
    }

    /// Returns true if the head overlaps any non-head segment.
    #[must_use]
    pub fn head_overlaps_body(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|segment| *segment == head)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Length the snake will reach once pending growth has landed; compared
    /// against a difficulty's level length to decide upgrades.
    #[must_use]
    pub fn starter_length(&self) -> usize {
        self.body.len() + self.pending_growth
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Tile> {
        self.body.iter()
    }
}
