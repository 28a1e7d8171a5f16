use crate::scheduler::Millis;
use crate::stimulus::schulte::{clamp_grid_size, DEFAULT_GRID_SIZE, GRID_SIZES};
use crate::stimulus::{SchulteBoard, SchulteSource};

use super::machine::{PhaseMachine, PhaseSpec, RoundLimit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SchultePhase {
    Active,
    Finished,
}

static SCHULTE_CYCLE: [PhaseSpec<SchultePhase>; 2] = [
    PhaseSpec::user(SchultePhase::Active),
    PhaseSpec::user(SchultePhase::Finished),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    /// The sought number was found; the next one is now sought
    Advanced,
    /// The last number was found
    Completed,
    /// Wrong number or board already complete; nothing changed
    Ignored,
}

/// Schulte table: find `1..=N²` in order. There are no timed phases; the only
/// transition is the validated click on the last number.
#[derive(Debug)]
pub struct SchulteTable {
    machine: PhaseMachine<SchultePhase, SchulteSource>,
    current: u32,
    started_at: Millis,
    elapsed_secs: u64,
    entry: String,
}

impl SchulteTable {
    pub fn new(size: usize, now: Millis) -> Self {
        Self::from_machine(Self::machine(size), now)
    }

    pub fn seeded(size: usize, seed: u64, now: Millis) -> Self {
        Self::from_machine(Self::machine(size).with_seed(seed), now)
    }

    fn machine(size: usize) -> PhaseMachine<SchultePhase, SchulteSource> {
        PhaseMachine::new(
            &SCHULTE_CYCLE,
            SchulteSource {
                size: clamp_grid_size(size),
            },
            RoundLimit::Bounded(1),
        )
    }

    fn from_machine(machine: PhaseMachine<SchultePhase, SchulteSource>, now: Millis) -> Self {
        Self {
            machine: machine.auto_started(now),
            current: 1,
            started_at: now,
            elapsed_secs: 0,
            entry: String::new(),
        }
    }

    /// New shuffled board, same size
    pub fn restart(&mut self, now: Millis) {
        self.machine.restart(now);
        self.current = 1;
        self.started_at = now;
        self.elapsed_secs = 0;
        self.entry.clear();
    }

    pub fn set_size(&mut self, size: usize, now: Millis) {
        self.machine.source_mut().size = clamp_grid_size(size);
        self.restart(now);
    }

    /// Cycles 3 → 4 → 5 → 6 → 3
    pub fn cycle_size(&mut self, now: Millis) {
        let next = if self.size() >= *GRID_SIZES.end() {
            *GRID_SIZES.start()
        } else {
            self.size() + 1
        };
        self.set_size(next, now);
    }

    pub fn click(&mut self, n: u32, now: Millis) -> Click {
        if self.is_complete() || n != self.current {
            return Click::Ignored;
        }
        if n == self.total() {
            self.on_tick(now);
            self.machine.advance(now);
            Click::Completed
        } else {
            self.current += 1;
            Click::Advanced
        }
    }

    /// Elapsed seconds keep counting only while the board is active
    pub fn on_tick(&mut self, now: Millis) {
        if !self.is_complete() {
            self.elapsed_secs = now.saturating_sub(self.started_at) / 1000;
        }
    }

    pub fn push_digit(&mut self, c: char) {
        if c.is_ascii_digit() && self.entry.len() < 2 {
            self.entry.push(c);
        }
    }

    pub fn pop_digit(&mut self) {
        self.entry.pop();
    }

    /// Clicks the typed number and clears the entry
    pub fn submit_entry(&mut self, now: Millis) -> Click {
        let typed = std::mem::take(&mut self.entry);
        match typed.parse::<u32>() {
            Ok(n) => self.click(n, now),
            Err(_) => Click::Ignored,
        }
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn board(&self) -> Option<&SchulteBoard> {
        self.machine.stimulus()
    }

    pub fn size(&self) -> usize {
        self.machine.source().size
    }

    pub fn total(&self) -> u32 {
        (self.size() * self.size()) as u32
    }

    /// The number being sought
    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn phase(&self) -> SchultePhase {
        self.machine.phase()
    }

    pub fn is_complete(&self) -> bool {
        self.machine.phase() == SchultePhase::Finished
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }
}

impl Default for SchulteTable {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE, 0)
    }
}
