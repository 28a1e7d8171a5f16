use rand::{seq::SliceRandom, Rng, RngCore};

use super::StimulusSource;

/// Difficulty tier of the flash-word drill, keyed by round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashTier {
    /// Single word of at most 6 characters
    Short,
    /// Single word longer than 7 characters
    Long,
    /// Two words from disjoint halves of the list
    Pair,
}

impl FlashTier {
    pub fn for_round(round: u32) -> Self {
        match round {
            0..=3 => FlashTier::Short,
            4..=6 => FlashTier::Long,
            _ => FlashTier::Pair,
        }
    }
}

const PAIR_FIRST: std::ops::Range<usize> = 0..10;
const PAIR_SECOND: std::ops::Range<usize> = 10..20;

#[derive(Debug, Clone)]
pub struct FlashWordSource {
    words: Vec<String>,
}

impl FlashWordSource {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    fn single<R: Rng + ?Sized>(&self, rng: &mut R, keep: impl Fn(&str) -> bool) -> String {
        let pool: Vec<&String> = self
            .words
            .iter()
            .filter(|w| !w.contains(' ') && keep(w))
            .collect();
        pool.choose(rng).map(|w| w.to_string()).unwrap_or_default()
    }

    fn pick_in<R: Rng + ?Sized>(&self, rng: &mut R, range: std::ops::Range<usize>) -> &str {
        let end = range.end.min(self.words.len());
        if range.start >= end {
            return "";
        }
        &self.words[rng.gen_range(range.start..end)]
    }
}

impl StimulusSource for FlashWordSource {
    type Stimulus = String;

    fn generate(&self, round: u32, rng: &mut dyn RngCore) -> String {
        match FlashTier::for_round(round) {
            FlashTier::Short => self.single(rng, |w| w.chars().count() <= 6),
            FlashTier::Long => self.single(rng, |w| w.chars().count() > 7),
            FlashTier::Pair => {
                let first = self.pick_in(rng, PAIR_FIRST).to_string();
                let second = self.pick_in(rng, PAIR_SECOND);
                format!("{first} {second}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stimulus::{LanguagePack, SupportedLanguage};
    use rand::{rngs::StdRng, SeedableRng};

    fn source() -> FlashWordSource {
        FlashWordSource::new(
            LanguagePack::load(SupportedLanguage::Polish)
                .unwrap()
                .flash_words,
        )
    }

    #[test]
    fn tiers_follow_rounds() {
        assert_eq!(FlashTier::for_round(1), FlashTier::Short);
        assert_eq!(FlashTier::for_round(3), FlashTier::Short);
        assert_eq!(FlashTier::for_round(4), FlashTier::Long);
        assert_eq!(FlashTier::for_round(6), FlashTier::Long);
        assert_eq!(FlashTier::for_round(7), FlashTier::Pair);
        assert_eq!(FlashTier::for_round(9), FlashTier::Pair);
    }

    #[test]
    fn early_rounds_draw_short_single_words() {
        let source = source();
        let mut rng = StdRng::seed_from_u64(1);
        for round in 1..=3 {
            for _ in 0..50 {
                let word = source.generate(round, &mut rng);
                assert!(!word.contains(' '));
                assert!(word.chars().count() <= 6, "{word}");
            }
        }
    }

    #[test]
    fn middle_rounds_draw_long_single_words() {
        let source = source();
        let mut rng = StdRng::seed_from_u64(2);
        for round in 4..=6 {
            for _ in 0..50 {
                let word = source.generate(round, &mut rng);
                assert!(!word.contains(' '));
                assert!(word.chars().count() > 7, "{word}");
            }
        }
    }

    #[test]
    fn late_rounds_pair_words_from_disjoint_halves() {
        let source = source();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let pair = source.generate(8, &mut rng);
            let (first, second) = pair.split_once(' ').unwrap();
            let first_idx = source.words.iter().position(|w| w == first).unwrap();
            let second_idx = source.words.iter().position(|w| w == second).unwrap();
            assert!(PAIR_FIRST.contains(&first_idx));
            assert!(PAIR_SECOND.contains(&second_idx));
        }
    }

    #[test]
    fn same_seed_same_words() {
        let source = source();
        let a = source.generate(5, &mut StdRng::seed_from_u64(99));
        let b = source.generate(5, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn short_list_degrades_to_empty_stimulus() {
        let source = FlashWordSource::new(vec!["kot".into()]);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(source.generate(5, &mut rng), "");
        assert_eq!(source.generate(7, &mut rng), "kot ");
    }
}
