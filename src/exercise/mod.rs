//! Exercises built on the shared [`machine::PhaseMachine`].

pub mod flash;
pub mod grid;
pub mod machine;
pub mod schulte;
pub mod view_field;

pub use flash::{flash_drill, visible_word, FlashDrill, FlashPhase};
pub use grid::PeripheralGrid;
pub use machine::{Advance, PhaseMachine, PhaseSpec, RoundLimit};
pub use schulte::{Click, SchultePhase, SchulteTable};
pub use view_field::{Verdict, ViewFieldPhase, ViewFieldTest};
