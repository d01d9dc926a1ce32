//! Uniform grid for proximity queries.
//!
//! The surface is cut into square cells whose side is the connection
//! distance (or wider on very large surfaces), so every particle closer than that distance lies in the 3×3
//! block of cells around the query point. The grid is cheap enough at the
//! particle counts used here to rebuild from scratch every drawn frame.

use glam::Vec2;

use crate::particle::Particle;

/// Upper bound on the number of cells in one grid.
pub const MAX_CELLS: usize = 1 << 16;

/// Particle indices bucketed by cell, valid for a single frame.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    columns: usize,
    rows: usize,
    cells: Vec<Vec<usize>>,
}

impl SpatialGrid {
    /// Bucket `particles` into cells of side at least `cell_size` covering
    /// `bounds`.
    ///
    /// Particles outside `[0, bounds)` are left out of the grid. Cells are
    /// widened (doubling) until the grid fits in [`MAX_CELLS`], which keeps
    /// the 3×3 neighborhood a superset of everything within `cell_size`. A
    /// non-positive or non-finite `cell_size` yields a grid with no cells.
    pub fn build(particles: &[Particle], cell_size: f32, bounds: Vec2) -> Self {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Self {
                cell_size,
                columns: 0,
                rows: 0,
                cells: Vec::new(),
            };
        }

        let mut cell_size = cell_size;
        while cell_size.is_finite() && Self::cell_count(cell_size, bounds) > MAX_CELLS as f32 {
            cell_size *= 2.0;
        }

        let columns = (bounds.x / cell_size).ceil().max(0.0) as usize;
        let rows = (bounds.y / cell_size).ceil().max(0.0) as usize;
        let mut cells = vec![Vec::new(); columns * rows];

        let mut grid = Self {
            cell_size,
            columns,
            rows,
            cells: Vec::new(),
        };

        for (index, particle) in particles.iter().enumerate() {
            if let Some(cell) = grid.cell_index(particle.position) {
                cells[cell].push(index);
            }
        }

        grid.cells = cells;
        grid
    }

    fn cell_count(cell_size: f32, bounds: Vec2) -> f32 {
        (bounds.x / cell_size).ceil().max(0.0) * (bounds.y / cell_size).ceil().max(0.0)
    }

    /// Side of a cell, possibly wider than requested.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Cell coordinates of a position. May lie outside the grid.
    pub fn cell_of(&self, position: Vec2) -> (i64, i64) {
        (
            (position.x / self.cell_size).floor() as i64,
            (position.y / self.cell_size).floor() as i64,
        )
    }

    /// Flat row-major index of the cell holding `position`, if inside the grid.
    pub fn cell_index(&self, position: Vec2) -> Option<usize> {
        let (column, row) = self.cell_of(position);
        if column < 0 || row < 0 || column >= self.columns as i64 || row >= self.rows as i64 {
            return None;
        }
        Some(row as usize * self.columns + column as usize)
    }

    /// Particle indices in the cell containing `position` and its eight
    /// neighbors, clipped to the grid.
    pub fn neighborhood(&self, position: Vec2) -> impl Iterator<Item = usize> + '_ {
        let (column, row) = self.cell_of(position);
        let last_column = self.columns as i64 - 1;
        let last_row = self.rows as i64 - 1;

        let columns = column.saturating_sub(1).max(0)..=column.saturating_add(1).min(last_column);
        let rows = row.saturating_sub(1).max(0)..=row.saturating_add(1).min(last_row);

        columns
            .flat_map(move |x| rows.clone().map(move |y| (x, y)))
            .flat_map(move |(x, y)| self.cells[y as usize * self.columns + x as usize].iter().copied())
    }
}
