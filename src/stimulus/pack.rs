use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};

use crate::error::PackError;

static LANG_DIR: Dir = include_dir!("src/lang");

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SupportedLanguage {
    Polish,
    English,
}

impl SupportedLanguage {
    fn file_name(&self) -> String {
        format!("{}.json", self.to_string().to_lowercase())
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct SpanWords {
    pub short: Vec<String>,
    pub medium: Vec<String>,
    pub long: Vec<String>,
    pub extra_long: Vec<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DefaultTexts {
    pub rsvp: String,
    pub wall: String,
    pub column: String,
}

/// Word lists and sample texts for one language, bundled at compile time
#[derive(Deserialize, Clone, Debug)]
pub struct LanguagePack {
    pub name: String,
    /// Question text for generated word-recognition quizzes
    pub quiz_prompt: String,
    pub flash_words: Vec<String>,
    pub span_words: SpanWords,
    #[serde(default)]
    pub sentences: Vec<String>,
    pub default_texts: DefaultTexts,
}

impl LanguagePack {
    pub fn load(language: SupportedLanguage) -> Result<Self, PackError> {
        read_pack(&language.file_name())
    }

    /// Every single word the pack knows, used as quiz distractors
    pub fn vocabulary(&self) -> Vec<&str> {
        let span = &self.span_words;
        let mut words: Vec<&str> = self
            .flash_words
            .iter()
            .chain(&span.short)
            .chain(&span.medium)
            .chain(&span.long)
            .chain(&span.extra_long)
            .flat_map(|w| w.split_whitespace())
            .collect();
        words.sort_unstable();
        words.dedup();
        words
    }
}

fn read_pack(file_name: &str) -> Result<LanguagePack, PackError> {
    let file = LANG_DIR
        .get_file(file_name)
        .ok_or_else(|| PackError::Missing(file_name.to_string()))?;

    let contents = file
        .contents_utf8()
        .ok_or_else(|| PackError::Missing(format!("{file_name} (not utf-8)")))?;

    serde_json::from_str(contents).map_err(|source| PackError::Invalid {
        name: file_name.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_packs_load() {
        for lang in [SupportedLanguage::Polish, SupportedLanguage::English] {
            let pack = LanguagePack::load(lang).unwrap();
            assert_eq!(pack.name, lang.to_string().to_lowercase());
            assert!(pack.flash_words.len() >= 20);
            assert!(!pack.span_words.short.is_empty());
            assert!(!pack.span_words.extra_long.is_empty());
            assert!(!pack.default_texts.rsvp.is_empty());
        }
    }

    #[test]
    fn polish_pack_carries_sentence_corpus() {
        let pack = LanguagePack::load(SupportedLanguage::Polish).unwrap();
        assert!(pack.sentences.len() >= 20);

        let english = LanguagePack::load(SupportedLanguage::English).unwrap();
        assert!(english.sentences.is_empty());
    }

    #[test]
    fn vocabulary_is_deduplicated_single_words() {
        let pack = LanguagePack::load(SupportedLanguage::Polish).unwrap();
        let vocab = pack.vocabulary();

        assert!(vocab.iter().all(|w| !w.contains(' ')));
        let mut sorted = vocab.clone();
        sorted.dedup();
        assert_eq!(sorted.len(), vocab.len());
        assert!(vocab.contains(&"kot"));
        assert!(vocab.contains(&"tekstu"));
    }

    #[test]
    fn missing_pack_is_an_error() {
        assert!(matches!(
            read_pack("klingon.json"),
            Err(PackError::Missing(_))
        ));
    }

    #[test]
    fn language_display_and_file_name() {
        assert_eq!(SupportedLanguage::Polish.to_string(), "Polish");
        assert_eq!(SupportedLanguage::English.file_name(), "english.json");
    }
}
