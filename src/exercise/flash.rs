use crate::scheduler::Millis;
use crate::stimulus::{FlashWordSource, LanguagePack};

use super::machine::{PhaseMachine, PhaseSpec, RoundLimit};

pub const FLASH_VISIBLE_MS: Millis = 500;
pub const FLASH_MASK_MS: Millis = 4_000;
pub const FLASH_ROUNDS: u32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum FlashPhase {
    Ready,
    Flash,
    Pause,
    Reveal,
}

static FLASH_CYCLE: [PhaseSpec<FlashPhase>; 4] = [
    PhaseSpec::user(FlashPhase::Ready),
    PhaseSpec::timed(FlashPhase::Flash, FLASH_VISIBLE_MS),
    PhaseSpec::timed(FlashPhase::Pause, FLASH_MASK_MS),
    PhaseSpec::user(FlashPhase::Reveal),
];

pub type FlashDrill = PhaseMachine<FlashPhase, FlashWordSource>;

/// Nine rounds of: show a word for half a second, mask it, then reveal it
pub fn flash_drill(pack: &LanguagePack) -> FlashDrill {
    PhaseMachine::new(
        &FLASH_CYCLE,
        FlashWordSource::new(pack.flash_words.clone()),
        RoundLimit::Bounded(FLASH_ROUNDS),
    )
}

/// Text to draw for the current phase, if the word is visible in it
pub fn visible_word(drill: &FlashDrill) -> Option<&str> {
    match drill.phase() {
        FlashPhase::Flash | FlashPhase::Reveal => drill.stimulus().map(String::as_str),
        FlashPhase::Ready | FlashPhase::Pause => None,
    }
}
