use std::ops::RangeInclusive;

use crate::scheduler::Millis;
use crate::stimulus::{LetterGrid, LetterSource};

use super::machine::{PhaseMachine, PhaseSpec, RoundLimit};

pub const GRID_ROUNDS: u32 = 9;
pub const SPACING_RANGE: RangeInclusive<u16> = 1..=8;
pub const DEFAULT_SPACING: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridPhase {
    Show,
}

static GRID_CYCLE: [PhaseSpec<GridPhase>; 1] = [PhaseSpec::user(GridPhase::Show)];

/// Peripheral letter grid: fixate the middle letter, read the rest without
/// moving the eyes. The spacing widens the field the eyes have to cover.
#[derive(Debug)]
pub struct PeripheralGrid {
    machine: PhaseMachine<GridPhase, LetterSource>,
    spacing: u16,
}

impl PeripheralGrid {
    pub fn new(now: Millis) -> Self {
        Self::from_machine(Self::machine(), now)
    }

    pub fn seeded(seed: u64, now: Millis) -> Self {
        Self::from_machine(Self::machine().with_seed(seed), now)
    }

    fn machine() -> PhaseMachine<GridPhase, LetterSource> {
        PhaseMachine::new(&GRID_CYCLE, LetterSource, RoundLimit::Bounded(GRID_ROUNDS))
    }

    fn from_machine(machine: PhaseMachine<GridPhase, LetterSource>, now: Millis) -> Self {
        Self {
            machine: machine.auto_started(now),
            spacing: DEFAULT_SPACING,
        }
    }

    pub fn next_table(&mut self, now: Millis) {
        self.machine.next_round(now);
    }

    pub fn restart(&mut self, now: Millis) {
        self.machine.restart(now);
    }

    pub fn letters(&self) -> Option<&LetterGrid> {
        self.machine.stimulus()
    }

    pub fn round(&self) -> u32 {
        self.machine.round()
    }

    pub fn is_finished(&self) -> bool {
        self.machine.is_finished()
    }

    pub fn spacing(&self) -> u16 {
        self.spacing
    }

    pub fn widen(&mut self) {
        self.set_spacing(self.spacing.saturating_add(1));
    }

    pub fn narrow(&mut self) {
        self.set_spacing(self.spacing.saturating_sub(1));
    }

    pub fn set_spacing(&mut self, spacing: u16) {
        self.spacing = spacing.clamp(*SPACING_RANGE.start(), *SPACING_RANGE.end());
    }
}
