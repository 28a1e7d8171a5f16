pub mod letters;
pub mod pack;
pub mod schulte;
pub mod span;
pub mod words;

use rand::RngCore;

pub use letters::{LetterGrid, LetterSource};
pub use pack::{LanguagePack, SupportedLanguage};
pub use schulte::{SchulteBoard, SchulteSource};
pub use span::{answer_matches, SpanSource, SpanTier};
pub use words::{FlashTier, FlashWordSource};

/// Produces the content for one round. Implementations are pure apart from
/// the draws they take from `rng`.
pub trait StimulusSource {
    type Stimulus: Clone + std::fmt::Debug;

    fn generate(&self, round: u32, rng: &mut dyn RngCore) -> Self::Stimulus;
}
