use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GridSize;
use crate::input::Direction;
use crate::item::Item;
use crate::snake::Snake;

/// Random probes made before falling back to scanning every free cell.
const MAX_RANDOM_PROBES: usize = 32;

/// Grid cell in logical cell coordinates. Compared by value.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
}

impl Tile {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the tile lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns the neighbouring tile one step towards `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Top-left pixel of this tile for a renderer using `cell_size` pixel cells.
    #[must_use]
    pub fn pixel_origin(self, cell_size: u16) -> (i32, i32) {
        let cell = i32::from(cell_size);
        (self.x * cell, self.y * cell)
    }
}

/// No free cell is left to place an item on.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum PlacementError {
    #[error("no free tile left on the {width}x{height} board")]
    BoardFull { width: u16, height: u16 },
}

/// Picks a uniformly random in-bounds tile that neither the snake nor any
/// item occupies.
///
/// Occupancy is counted first so a full board is reported instead of
/// searched forever. A few random probes cover the common sparse board;
/// after that the free cells are enumerated and one is drawn from them.
pub fn random_free_tile<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
    items: &[Item],
) -> Result<Tile, PlacementError> {
    let occupied: HashSet<Tile> = snake
        .segments()
        .copied()
        .chain(items.iter().map(|item| item.tile))
        .filter(|tile| tile.is_within_bounds(bounds))
        .collect();

    if occupied.len() >= bounds.total_cells() {
        return Err(PlacementError::BoardFull {
            width: bounds.width,
            height: bounds.height,
        });
    }

    for _ in 0..MAX_RANDOM_PROBES {
        let candidate = Tile {
            x: rng.gen_range(0..i32::from(bounds.width)),
            y: rng.gen_range(0..i32::from(bounds.height)),
        };
        if !occupied.contains(&candidate) {
            return Ok(candidate);
        }
    }

    let mut candidates = Vec::new();
    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let tile = Tile { x, y };
            if !occupied.contains(&tile) {
                candidates.push(tile);
            }
        }
    }

    if candidates.is_empty() {
        return Err(PlacementError::BoardFull {
            width: bounds.width,
            height: bounds.height,
        });
    }

    let index = rng.gen_range(0..candidates.len());
    Ok(candidates[index])
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::GridSize;
    use crate::input::Direction;
    use crate::item::Item;
    use crate::snake::Snake;

    use super::{random_free_tile, PlacementError, Tile};

    #[test]
    fn bounds_check_covers_both_axes() {
        let bounds = GridSize {
            width: 10,
            height: 8,
        };

        assert!(Tile::new(0, 0).is_within_bounds(bounds));
        assert!(Tile::new(9, 7).is_within_bounds(bounds));
        assert!(!Tile::new(10, 3).is_within_bounds(bounds));
        assert!(!Tile::new(3, 8).is_within_bounds(bounds));
        assert!(!Tile::new(-1, 3).is_within_bounds(bounds));
        assert!(!Tile::new(3, -1).is_within_bounds(bounds));
    }

    #[test]
    fn step_moves_one_cell() {
        let tile = Tile::new(4, 4);

        assert_eq!(tile.step(Direction::Up), Tile::new(4, 3));
        assert_eq!(tile.step(Direction::Down), Tile::new(4, 5));
        assert_eq!(tile.step(Direction::Left), Tile::new(3, 4));
        assert_eq!(tile.step(Direction::Right), Tile::new(5, 4));
        assert_eq!(tile.pixel_origin(10), (40, 40));
    }

    #[test]
    fn free_tile_never_overlaps_snake_or_items() {
        let mut rng = StdRng::seed_from_u64(7);
        let bounds = GridSize {
            width: 8,
            height: 6,
        };
        let snake = Snake::from_segments(
            vec![Tile::new(2, 0), Tile::new(1, 0), Tile::new(0, 0)],
            Direction::Right,
            0,
        );
        let items = vec![Item::apple(Tile::new(4, 4)), Item::golden(Tile::new(5, 5))];

        for _ in 0..200 {
            let tile = random_free_tile(&mut rng, bounds, &snake, &items)
                .expect("board has plenty of room");
            assert!(tile.is_within_bounds(bounds));
            assert!(!snake.occupies(tile));
            assert!(items.iter().all(|item| item.tile != tile));
        }
    }

    #[test]
    fn last_free_cell_is_found() {
        let mut rng = StdRng::seed_from_u64(11);
        let bounds = GridSize {
            width: 3,
            height: 3,
        };
        // Snake winds through every cell except (2, 2).
        let snake = Snake::from_segments(
            vec![
                Tile::new(0, 0),
                Tile::new(1, 0),
                Tile::new(2, 0),
                Tile::new(2, 1),
                Tile::new(1, 1),
                Tile::new(0, 1),
                Tile::new(0, 2),
                Tile::new(1, 2),
            ],
            Direction::Up,
            0,
        );

        let tile = random_free_tile(&mut rng, bounds, &snake, &[])
            .expect("one cell is still free");

        assert_eq!(tile, Tile::new(2, 2));
    }

    #[test]
    fn full_board_reports_exhaustion() {
        let mut rng = StdRng::seed_from_u64(3);
        let bounds = GridSize {
            width: 2,
            height: 2,
        };
        let snake = Snake::from_segments(
            vec![Tile::new(0, 0), Tile::new(1, 0), Tile::new(1, 1)],
            Direction::Down,
            0,
        );
        let items = vec![Item::apple(Tile::new(0, 1))];

        assert_eq!(
            random_free_tile(&mut rng, bounds, &snake, &items),
            Err(PlacementError::BoardFull {
                width: 2,
                height: 2
            })
        );
    }

    #[test]
    fn off_board_segments_do_not_count_as_occupancy() {
        let mut rng = StdRng::seed_from_u64(5);
        let bounds = GridSize {
            width: 2,
            height: 1,
        };
        let snake = Snake::from_segments(
            vec![Tile::new(2, 0), Tile::new(1, 0)],
            Direction::Right,
            0,
        );

        let tile = random_free_tile(&mut rng, bounds, &snake, &[]).expect("(0, 0) is free");

        assert_eq!(tile, Tile::new(0, 0));
    }
}
