//! Path indexing over flat replica-ordered arrays

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView2, Axis};
use std::ops::Range;

/// Slices a flat replica-ordered matrix into per-pathway windows
///
/// Row `i` belongs to pathway `i / nrep` at replica offset `i % nrep`.
#[derive(Debug, Clone, Copy)]
pub struct PathIndexer {
    nrep: usize,
}

impl PathIndexer {
    /// Build an indexer for paths of `nrep` replicas each
    pub fn new(nrep: usize) -> Result<Self> {
        if nrep < 3 {
            return Err(Error::InvalidConfig(format!(
                "paths need at least 3 replicas for interior gradients, got {nrep}"
            )));
        }
        Ok(Self { nrep })
    }

    /// Replicas per path
    pub fn nrep(&self) -> usize {
        self.nrep
    }

    /// Number of complete paths in `rows` replica rows
    pub fn n_paths(&self, rows: usize) -> Result<usize> {
        if rows == 0 || rows % self.nrep != 0 {
            return Err(Error::ShapeMismatch(format!(
                "{rows} replica rows do not divide into paths of {} replicas",
                self.nrep
            )));
        }
        Ok(rows / self.nrep)
    }

    /// Row range of one pathway
    pub fn path_rows(&self, pathid: usize) -> Range<usize> {
        pathid * self.nrep..(pathid + 1) * self.nrep
    }

    /// View of one pathway's rows
    pub fn path<'a>(&self, ds: &'a Array2<f64>, pathid: usize) -> Result<ArrayView2<'a, f64>> {
        let range = self.path_rows(pathid);
        if range.end > ds.nrows() {
            return Err(Error::ShapeMismatch(format!(
                "path {pathid} needs rows {}..{} but dataset has {}",
                range.start,
                range.end,
                ds.nrows()
            )));
        }
        Ok(ds.slice_axis(Axis(0), (range.start..range.end).into()))
    }
}
