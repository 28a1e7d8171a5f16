//! View-field span strings.
//!
//! Levels 1-12 walk through fixed word-length tiers. Past level 12 the word
//! count follows `floor((level - 9) / 4) + 2`, alternating medium (even) and
//! short (odd) words. The curve is irregular on purpose; keep it as is.

use rand::{seq::SliceRandom, Rng, RngCore};

use super::{pack::SpanWords, StimulusSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanTier {
    Short,
    Medium,
    Long,
    ExtraLong,
}

/// Word tier and word count for a level
pub fn layout_for_level(level: u32) -> (SpanTier, usize) {
    match level {
        0..=2 => (SpanTier::Short, 1),
        3..=4 => (SpanTier::Medium, 1),
        5..=6 => (SpanTier::Long, 1),
        7..=8 => (SpanTier::ExtraLong, 1),
        9..=10 => (SpanTier::Short, 2),
        11..=12 => (SpanTier::Medium, 2),
        _ => {
            let count = ((level - 9) / 4) as usize + 2;
            let tier = if level % 2 == 0 {
                SpanTier::Medium
            } else {
                SpanTier::Short
            };
            (tier, count)
        }
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Case- and whitespace-insensitive comparison of a typed answer
pub fn answer_matches(source: &str, answer: &str) -> bool {
    normalize(source) == normalize(answer)
}

#[derive(Debug, Clone)]
pub struct SpanSource {
    words: SpanWords,
}

impl SpanSource {
    pub fn new(words: SpanWords) -> Self {
        Self { words }
    }

    fn pool(&self, tier: SpanTier) -> &[String] {
        match tier {
            SpanTier::Short => &self.words.short,
            SpanTier::Medium => &self.words.medium,
            SpanTier::Long => &self.words.long,
            SpanTier::ExtraLong => &self.words.extra_long,
        }
    }

    pub fn string_for_level<R: Rng + ?Sized>(&self, level: u32, rng: &mut R) -> String {
        let (tier, count) = layout_for_level(level);
        let pool = self.pool(tier);
        (0..count)
            .filter_map(|_| pool.choose(rng))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl StimulusSource for SpanSource {
    type Stimulus = String;

    fn generate(&self, level: u32, rng: &mut dyn RngCore) -> String {
        self.string_for_level(level, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stimulus::{LanguagePack, SupportedLanguage};
    use rand::{rngs::StdRng, SeedableRng};

    fn source() -> SpanSource {
        SpanSource::new(
            LanguagePack::load(SupportedLanguage::Polish)
                .unwrap()
                .span_words,
        )
    }

    #[test]
    fn fixed_levels() {
        assert_eq!(layout_for_level(1), (SpanTier::Short, 1));
        assert_eq!(layout_for_level(4), (SpanTier::Medium, 1));
        assert_eq!(layout_for_level(5), (SpanTier::Long, 1));
        assert_eq!(layout_for_level(8), (SpanTier::ExtraLong, 1));
        assert_eq!(layout_for_level(10), (SpanTier::Short, 2));
        assert_eq!(layout_for_level(11), (SpanTier::Medium, 2));
    }

    #[test]
    fn growth_formula_past_twelve() {
        assert_eq!(layout_for_level(13), (SpanTier::Short, 3));
        assert_eq!(layout_for_level(14), (SpanTier::Medium, 3));
        assert_eq!(layout_for_level(16), (SpanTier::Medium, 3));
        assert_eq!(layout_for_level(17), (SpanTier::Short, 4));
        assert_eq!(layout_for_level(21), (SpanTier::Short, 5));
    }

    #[test]
    fn low_levels_are_one_short_word() {
        let source = source();
        let mut rng = StdRng::seed_from_u64(5);
        for level in 1..=2 {
            for _ in 0..30 {
                let s = source.string_for_level(level, &mut rng);
                let tokens: Vec<&str> = s.split(' ').collect();
                assert_eq!(tokens.len(), 1);
                assert!(source.words.short.iter().any(|w| w == tokens[0]));
            }
        }
    }

    #[test]
    fn level_eleven_is_two_medium_words() {
        let source = source();
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..30 {
            let s = source.string_for_level(11, &mut rng);
            let tokens: Vec<&str> = s.split(' ').collect();
            assert_eq!(tokens.len(), 2);
            for t in tokens {
                assert!(source.words.medium.iter().any(|w| w == t), "{t}");
            }
        }
    }

    #[test]
    fn answers_ignore_case_and_whitespace() {
        assert!(answer_matches("kot dom", "Kot Dom"));
        assert!(answer_matches("kot dom", "kotdom"));
        assert!(answer_matches("kot dom", "  KOT\tdom "));
        assert!(answer_matches("Książka", "KSIĄŻKA"));
        assert!(!answer_matches("kot dom", "kot"));
        assert!(!answer_matches("kot", ""));
    }
}
