use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::Position;

/// Errors raised by grid writes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Coordinates ({x}, {y}) are out of bounds for grid size ({width}, {height})")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

/// A fixed-size 2D grid stored row-major in a flat vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Creates a grid filled with default values.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Self
    where
        T: Default + Clone,
    {
        let size = width.checked_mul(height).expect("Grid size overflow");
        Grid {
            width,
            height,
            cells: vec![T::default(); size],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn coords_to_index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// Checks if `pos` is within the grid boundaries.
    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        self.coords_to_index(pos.x, pos.y).is_some()
    }

    /// Gets the cell at `pos`, or `None` outside the grid.
    pub fn get(&self, pos: Position) -> Option<&T> {
        let index = self.coords_to_index(pos.x, pos.y)?;
        self.cells.get(index)
    }

    /// Overwrites the cell at `pos`.
    pub fn set(&mut self, pos: Position, value: T) -> Result<(), GridError> {
        let index = self
            .coords_to_index(pos.x, pos.y)
            .ok_or(GridError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                width: self.width,
                height: self.height,
            })?;
        self.cells[index] = value;
        Ok(())
    }
}

impl<T> Index<Position> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, pos: Position) -> &Self::Output {
        match self.coords_to_index(pos.x, pos.y) {
            Some(idx) => &self.cells[idx],
            None => panic!(
                "Grid index ({}, {}) out of bounds for grid size ({}, {})",
                pos.x, pos.y, self.width, self.height
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_by_position() {
        let mut grid: Grid<u8> = Grid::new(3, 2);
        grid.set(Position::new(2, 1), 12).unwrap();
        assert_eq!(grid[Position::new(2, 1)], 12);
        assert!(grid.contains(Position::new(2, 1)));
        assert!(!grid.contains(Position::new(3, 1)));
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
    }

    #[test]
    fn get_outside_is_none() {
        let grid: Grid<u8> = Grid::new(4, 4);
        assert_eq!(grid.get(Position::new(4, 0)), None);
        assert_eq!(grid.get(Position::new(0, 4)), None);
        assert_eq!(grid.get(Position::new(3, 3)), Some(&0));
    }

    #[test]
    fn set_reports_out_of_bounds() {
        let mut grid: Grid<bool> = Grid::new(2, 2);
        assert!(grid.set(Position::new(1, 1), true).is_ok());
        assert!(grid[Position::new(1, 1)]);
        assert_eq!(
            grid.set(Position::new(5, 0), true),
            Err(GridError::OutOfBounds {
                x: 5,
                y: 0,
                width: 2,
                height: 2
            })
        );
    }
}
