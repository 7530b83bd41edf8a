//! Core utilities shared by the neighborhood filters.
//!
//! This module provides:
//! - Edge-replicating coordinate clamping
//! - Row-parallel output traversal

use rayon::prelude::*;
use ndarray::{Array, ArrayViewMut, Axis, Dimension, RemoveAxis};

/// Offset `pos` by `offset` and clamp into `0..len` (edge replication).
#[inline]
pub fn clamp_coord(pos: usize, offset: isize, len: usize) -> usize {
    (pos as isize + offset).clamp(0, len as isize - 1) as usize
}

/// Visit every output row, optionally on the rayon thread pool.
///
/// `f` receives the row index and a mutable view of that row. Rows never
/// alias, so the result does not depend on `parallel`.
pub fn for_each_row<A, D, F>(output: &mut Array<A, D>, parallel: bool, f: F)
where
    A: Send + Sync,
    D: Dimension + RemoveAxis,
    F: Fn(usize, ArrayViewMut<'_, A, D::Smaller>) + Send + Sync,
{
    if parallel {
        output
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(y, row)| f(y, row));
    } else {
        for (y, row) in output.axis_iter_mut(Axis(0)).enumerate() {
            f(y, row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, ArrayViewMut1};

    #[test]
    fn test_clamp_coord_replicates_edges() {
        assert_eq!(clamp_coord(0, -2, 5), 0);
        assert_eq!(clamp_coord(4, 3, 5), 4);
        assert_eq!(clamp_coord(2, 1, 5), 3);
    }

    fn fill(y: usize, mut row: ArrayViewMut1<'_, u32>) {
        for (x, v) in row.iter_mut().enumerate() {
            *v = (y * 100 + x) as u32;
        }
    }

    #[test]
    fn test_for_each_row_parallel_matches_sequential() {
        let mut seq = Array2::<u32>::zeros((17, 9));
        let mut par = Array2::<u32>::zeros((17, 9));

        for_each_row(&mut seq, false, fill);
        for_each_row(&mut par, true, fill);

        assert_eq!(seq, par);
        assert_eq!(seq[[16, 8]], 1608);
    }
}
