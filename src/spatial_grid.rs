/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct for neighbor lookups that avoid
 * scanning the whole flock. Space is divided into uniform cubic cells keyed by
 * integer coordinates, so the grid is unbounded and only occupied cells are
 * stored.
 *
 * The grid only narrows the candidate set. Candidates come back in ascending
 * index order, so the per-force radius filters that follow visit neighbors in
 * exactly the order a full scan would.
 */

use std::collections::HashMap;

use glam::{IVec3, Vec3};

// Cells smaller than this would explode the cell count for tiny radii
const MIN_CELL_SIZE: f32 = 1.0e-3;

pub struct SpatialGrid {
    pub cell_size: f32,
    cells: HashMap<IVec3, Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: Self::sanitize(cell_size),
            cells: HashMap::new(),
        }
    }

    fn sanitize(cell_size: f32) -> f32 {
        if cell_size.is_finite() {
            cell_size.max(MIN_CELL_SIZE)
        } else {
            MIN_CELL_SIZE
        }
    }

    // Convert world coordinates to integer cell coordinates
    #[inline]
    pub fn cell_of(&self, position: Vec3) -> IVec3 {
        (position / self.cell_size).floor().as_ivec3()
    }

    pub fn clear(&mut self) {
        for cell in self.cells.values_mut() {
            cell.clear();
        }
    }

    /// Empty the grid and refill it from `positions`, resizing cells first.
    pub fn rebuild(&mut self, cell_size: f32, positions: impl Iterator<Item = Vec3>) {
        let cell_size = Self::sanitize(cell_size);
        if (cell_size - self.cell_size).abs() > f32::EPSILON {
            self.cell_size = cell_size;
            self.cells.clear();
        } else {
            self.clear();
        }

        for (index, position) in positions.enumerate() {
            self.insert(index, position);
        }
    }

    #[inline]
    pub fn insert(&mut self, index: usize, position: Vec3) {
        let cell = self.cell_of(position);
        self.cells.entry(cell).or_default().push(index);
    }

    /// Indices of every entry in a cell overlapping the cube of half-width
    /// `radius` around `position`, sorted ascending. Everything within
    /// `radius` is included; callers still apply the exact distance test.
    pub fn get_nearby_indices(&self, position: Vec3, radius: f32, result: &mut Vec<usize>) {
        result.clear();

        let radius = radius.max(0.0);
        let min = self.cell_of(position - Vec3::splat(radius));
        let max = self.cell_of(position + Vec3::splat(radius));

        for z in min.z..=max.z {
            for y in min.y..=max.y {
                for x in min.x..=max.x {
                    if let Some(cell) = self.cells.get(&IVec3::new(x, y, z)) {
                        result.extend_from_slice(cell);
                    }
                }
            }
        }

        result.sort_unstable();
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.values().filter(|cell| !cell.is_empty()).count()
    }
}
