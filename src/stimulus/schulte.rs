use std::ops::RangeInclusive;

use rand::{seq::SliceRandom, Rng, RngCore};

use super::StimulusSource;

pub const GRID_SIZES: RangeInclusive<usize> = 3..=6;
pub const DEFAULT_GRID_SIZE: usize = 5;

pub fn clamp_grid_size(size: usize) -> usize {
    let clamped = size.clamp(*GRID_SIZES.start(), *GRID_SIZES.end());
    if clamped != size {
        tracing::debug!(requested = size, clamped, "schulte grid size clamped");
    }
    clamped
}

/// Shuffled numbers `1..=N²` laid out row by row on an N×N board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchulteBoard {
    size: usize,
    cells: Vec<u32>,
}

impl SchulteBoard {
    pub fn shuffled<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let size = clamp_grid_size(size);
        let mut cells: Vec<u32> = (1..=(size * size) as u32).collect();
        cells.shuffle(rng);
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn total(&self) -> u32 {
        (self.size * self.size) as u32
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.cells.chunks(self.size)
    }

    pub fn contains(&self, n: u32) -> bool {
        (1..=self.total()).contains(&n)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SchulteSource {
    pub size: usize,
}

impl StimulusSource for SchulteSource {
    type Stimulus = SchulteBoard;

    fn generate(&self, _round: u32, rng: &mut dyn RngCore) -> SchulteBoard {
        SchulteBoard::shuffled(self.size, rng)
    }
}
