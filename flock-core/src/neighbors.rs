//! Neighbor lookup used by steering and boid-boid collision.
//!
//! Both passes only ever ask "which boids lie within `radius` of boid `i`",
//! so the lookup strategy can be swapped without touching either of them.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::boid::Boid;
use crate::vector::Vector3D;

/// Strategy for listing the boids near a given boid.
pub trait NeighborSearch {
    /// Refreshes any internal index from the current positions.
    fn rebuild(&mut self, boids: &[Boid]);

    /// Appends to `out` every index `j != index` whose centre lies strictly
    /// within `radius` of boid `index`, in no particular order.
    fn neighbors(&self, boids: &[Boid], index: usize, radius: f32, out: &mut Vec<usize>);
}

/// Compares every boid against every other, O(n²) per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

impl NeighborSearch for BruteForce {
    fn rebuild(&mut self, _boids: &[Boid]) {}

    fn neighbors(&self, boids: &[Boid], index: usize, radius: f32, out: &mut Vec<usize>) {
        let center = boids[index].position;
        let radius_sq = radius * radius;
        out.extend(
            boids
                .iter()
                .enumerate()
                .filter(|(j, other)| {
                    *j != index && center.distance_squared(&other.position) < radius_sq
                })
                .map(|(j, _)| j),
        );
    }
}

// Keeps a runaway extent (a boid flung far away) from allocating a huge grid.
const MAX_CELLS_PER_AXIS: usize = 64;

/// Uniform spatial hash over the bounding box of the current positions.
#[derive(Debug, Clone)]
pub struct UniformGrid {
    cell_size: f32,
    origin: Vector3D,
    cell_dims: Vector3D,
    dims: [usize; 3],
    cells: Vec<Vec<usize>>,
}

impl UniformGrid {
    /// `cell_size` is usually the largest query radius, e.g. the perception
    /// radius. Non-positive sizes fall back to 1.
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        Self {
            cell_size,
            origin: Vector3D::zero(),
            cell_dims: Vector3D::splat(cell_size),
            dims: [0; 3],
            cells: Vec::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn axis_cell(&self, axis: usize, coordinate: f32) -> usize {
        let t = (coordinate - self.origin.axis(axis)) / self.cell_dims.axis(axis);
        // Truncation is floor once clamped at zero; NaN also lands in cell 0.
        let t = if t > 0.0 { t } else { 0.0 };
        (t as usize).min(self.dims[axis] - 1)
    }

    fn flat_index(&self, cell: [usize; 3]) -> usize {
        (cell[2] * self.dims[1] + cell[1]) * self.dims[0] + cell[0]
    }
}

impl Default for UniformGrid {
    fn default() -> Self {
        Self::new(6.0)
    }
}

impl NeighborSearch for UniformGrid {
    fn rebuild(&mut self, boids: &[Boid]) {
        for cell in &mut self.cells {
            cell.clear();
        }
        let Some(first) = boids.first() else {
            self.dims = [0; 3];
            return;
        };

        let (lo, hi) = boids
            .iter()
            .filter(|b| b.position.is_finite())
            .fold((first.position, first.position), |(lo, hi), b| {
                (lo.min(&b.position), hi.max(&b.position))
            });
        self.origin = lo;

        for axis in 0..3 {
            let extent = hi.axis(axis) - lo.axis(axis);
            let extent = if extent.is_finite() { extent } else { 0.0 };
            let per_axis = extent / MAX_CELLS_PER_AXIS as f32;
            let size = if per_axis > self.cell_size {
                per_axis
            } else {
                self.cell_size
            };
            *self.cell_dims.axis_mut(axis) = size;
            self.dims[axis] = ((extent / size) as usize + 1).min(MAX_CELLS_PER_AXIS);
        }

        let total = self.dims.iter().product::<usize>();
        if self.cells.len() < total {
            self.cells.resize_with(total, Vec::new);
        }

        for (i, boid) in boids.iter().enumerate() {
            let cell = [
                self.axis_cell(0, boid.position.x),
                self.axis_cell(1, boid.position.y),
                self.axis_cell(2, boid.position.z),
            ];
            let flat = self.flat_index(cell);
            self.cells[flat].push(i);
        }
    }

    fn neighbors(&self, boids: &[Boid], index: usize, radius: f32, out: &mut Vec<usize>) {
        if self.dims.contains(&0) {
            return;
        }
        let center = boids[index].position;
        let radius_sq = radius * radius;

        let mut lo = [0; 3];
        let mut hi = [0; 3];
        for axis in 0..3 {
            lo[axis] = self.axis_cell(axis, center.axis(axis) - radius);
            hi[axis] = self.axis_cell(axis, center.axis(axis) + radius);
        }

        for z in lo[2]..=hi[2] {
            for y in lo[1]..=hi[1] {
                for x in lo[0]..=hi[0] {
                    let flat = self.flat_index([x, y, z]);
                    out.extend(self.cells[flat].iter().copied().filter(|&j| {
                        j != index && center.distance_squared(&boids[j].position) < radius_sq
                    }));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Bounds;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn boid_at(x: f32, y: f32, z: f32) -> Boid {
        Boid::new(Vector3D::new(x, y, z), Vector3D::zero(), 1.0)
    }

    fn sorted_neighbors<S: NeighborSearch>(
        search: &S,
        boids: &[Boid],
        index: usize,
        radius: f32,
    ) -> Vec<usize> {
        let mut out = Vec::new();
        search.neighbors(boids, index, radius, &mut out);
        out.sort_unstable();
        out
    }

    #[test]
    fn test_brute_force_excludes_self_and_far_boids() {
        let boids = vec![
            boid_at(0.0, 0.0, 0.0),
            boid_at(1.0, 0.0, 0.0),
            boid_at(0.0, 5.0, 0.0),
        ];
        assert_eq!(sorted_neighbors(&BruteForce, &boids, 0, 2.0), vec![1]);
        assert_eq!(sorted_neighbors(&BruteForce, &boids, 2, 10.0), vec![0, 1]);
    }

    #[test]
    fn test_neighbor_radius_is_exclusive() {
        let boids = vec![boid_at(0.0, 0.0, 0.0), boid_at(2.0, 0.0, 0.0)];
        assert!(sorted_neighbors(&BruteForce, &boids, 0, 2.0).is_empty());
    }

    #[test]
    fn test_grid_matches_brute_force() {
        let mut rng = SmallRng::seed_from_u64(42);
        let bounds = Bounds::cube(30.0);
        let boids: Vec<Boid> = (0..150)
            .map(|_| Boid::random(&bounds, 1.0, 1.0, &mut rng))
            .collect();

        let mut grid = UniformGrid::new(4.0);
        grid.rebuild(&boids);

        for radius in [0.5, 4.0, 9.0, 100.0] {
            for i in 0..boids.len() {
                assert_eq!(
                    sorted_neighbors(&grid, &boids, i, radius),
                    sorted_neighbors(&BruteForce, &boids, i, radius),
                    "boid {} radius {}",
                    i,
                    radius
                );
            }
        }
    }

    #[test]
    fn test_grid_caps_cells_for_outliers() {
        let boids = vec![boid_at(0.0, 0.0, 0.0), boid_at(1.0e6, 0.0, 0.0), boid_at(0.5, 0.0, 0.0)];
        let mut grid = UniformGrid::new(1.0);
        grid.rebuild(&boids);

        assert!(grid.cells.len() <= MAX_CELLS_PER_AXIS);
        assert_eq!(sorted_neighbors(&grid, &boids, 0, 1.0), vec![2]);
    }

    #[test]
    fn test_grid_rebuild_after_shrink() {
        let mut grid = UniformGrid::new(2.0);
        grid.rebuild(&[boid_at(0.0, 0.0, 0.0), boid_at(1.0, 0.0, 0.0)]);
        grid.rebuild(&[]);

        let boids = vec![boid_at(3.0, 3.0, 3.0)];
        grid.rebuild(&boids);
        assert!(sorted_neighbors(&grid, &boids, 0, 5.0).is_empty());
    }
}
