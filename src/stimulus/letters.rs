use rand::{Rng, RngCore};

use super::StimulusSource;

pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const GRID_LETTERS: usize = 9;
/// Middle cell of the 3x3 layout
pub const FIXATION_INDEX: usize = 4;

/// Nine consecutive letters laid out row by row in a 3x3 grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterGrid {
    start: usize,
    letters: Vec<char>,
}

impl LetterGrid {
    pub fn from_offset(start: usize) -> Self {
        let start = start.min(ALPHABET.len() - GRID_LETTERS);
        Self {
            start,
            letters: ALPHABET.chars().skip(start).take(GRID_LETTERS).collect(),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_offset(rng.gen_range(0..ALPHABET.len() - GRID_LETTERS))
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    pub fn fixation(&self) -> char {
        self.letters[FIXATION_INDEX]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.letters.chunks(3)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LetterSource;

impl StimulusSource for LetterSource {
    type Stimulus = LetterGrid;

    fn generate(&self, _round: u32, rng: &mut dyn RngCore) -> LetterGrid {
        LetterGrid::random(rng)
    }
}
