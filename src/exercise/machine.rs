//! Generic round/phase engine shared by the drill exercises.
//!
//! An exercise is described by data: a cycle of phases, each either timed or
//! waiting for the user, a round limit, and a stimulus source. The machine
//! owns exactly one [`Timer`]; every phase change cancels it before arming a
//! new one, so a stale transition can never fire after a restart.

use rand::{rngs::StdRng, SeedableRng};

use crate::scheduler::{Millis, Timer};
use crate::stimulus::StimulusSource;

/// How a phase is left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Automatically after the given number of milliseconds
    After(Millis),
    /// On an explicit user action
    User,
}

#[derive(Debug, Clone, Copy)]
pub struct PhaseSpec<P> {
    pub phase: P,
    pub advance: Advance,
}

impl<P> PhaseSpec<P> {
    pub const fn timed(phase: P, ms: Millis) -> Self {
        Self {
            phase,
            advance: Advance::After(ms),
        }
    }

    pub const fn user(phase: P) -> Self {
        Self {
            phase,
            advance: Advance::User,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundLimit {
    Bounded(u32),
    Unbounded,
}

impl RoundLimit {
    fn allows_next(&self, round: u32) -> bool {
        match self {
            RoundLimit::Bounded(max) => round < *max,
            RoundLimit::Unbounded => round < u32::MAX,
        }
    }
}

pub struct PhaseMachine<P: 'static, S: StimulusSource> {
    cycle: &'static [PhaseSpec<P>],
    source: S,
    rng: StdRng,
    limit: RoundLimit,
    auto_start: bool,
    index: usize,
    round: u32,
    finished: bool,
    stimulus: Option<S::Stimulus>,
    timer: Timer,
}

impl<P: Copy + PartialEq + std::fmt::Debug + 'static, S: StimulusSource> PhaseMachine<P, S> {
    /// `cycle[0]` is the initial phase. The cycle must not be empty and its
    /// last phase must be user-acknowledged.
    pub fn new(cycle: &'static [PhaseSpec<P>], source: S, limit: RoundLimit) -> Self {
        debug_assert!(!cycle.is_empty());
        debug_assert!(cycle
            .last()
            .map_or(false, |spec| spec.advance == Advance::User));
        Self {
            cycle,
            source,
            rng: StdRng::from_entropy(),
            limit,
            auto_start: false,
            index: 0,
            round: 1,
            finished: false,
            stimulus: None,
            timer: Timer::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Rounds begin immediately in the initial phase instead of waiting in it
    /// for a user start. Starts the first round right away.
    pub fn auto_started(mut self, now: Millis) -> Self {
        self.auto_start = true;
        self.start_round(now);
        self
    }

    /// Generates the stimulus for the current round and enters the first
    /// active phase. Only valid from the initial phase of an unfinished
    /// machine; returns false otherwise.
    pub fn start_round(&mut self, now: Millis) -> bool {
        if self.finished || self.index != 0 || (self.auto_start && self.stimulus.is_some()) {
            return false;
        }
        self.stimulus = Some(self.source.generate(self.round, &mut self.rng));
        let first = if self.auto_start || self.cycle.len() == 1 {
            0
        } else {
            1
        };
        self.enter(first, now);
        true
    }

    /// Moves to the next phase. No-op when finished or on the final phase.
    pub fn advance(&mut self, now: Millis) -> bool {
        if self.finished || self.index + 1 >= self.cycle.len() {
            return false;
        }
        if self.index == 0 && self.stimulus.is_none() {
            return false;
        }
        self.enter(self.index + 1, now);
        true
    }

    /// Fires any due transition. Chained timed phases are scheduled from the
    /// previous deadline so their lengths do not depend on tick granularity.
    pub fn on_tick(&mut self, now: Millis) -> bool {
        let mut changed = false;
        while let Some(due) = self.timer.fire(now) {
            changed |= self.advance(due);
        }
        changed
    }

    /// Completes the current round: either returns to the initial phase with
    /// the next round number, or marks the machine finished.
    pub fn next_round(&mut self, now: Millis) -> bool {
        if self.finished {
            return false;
        }
        self.timer.cancel();
        if self.limit.allows_next(self.round) {
            self.round += 1;
            self.stimulus = None;
            self.enter(0, now);
            if self.auto_start {
                self.start_round(now);
            }
        } else {
            self.finished = true;
        }
        true
    }

    pub fn restart(&mut self, now: Millis) {
        self.timer.cancel();
        self.round = 1;
        self.finished = false;
        self.stimulus = None;
        self.enter(0, now);
        if self.auto_start {
            self.start_round(now);
        }
    }

    fn enter(&mut self, index: usize, from: Millis) {
        self.timer.cancel();
        self.index = index;
        if let Advance::After(ms) = self.cycle[index].advance {
            self.timer.arm(from, ms);
        }
    }

    pub fn phase(&self) -> P {
        self.cycle[self.index].phase
    }

    pub fn is_initial(&self) -> bool {
        self.index == 0
    }

    pub fn is_final_phase(&self) -> bool {
        self.index + 1 == self.cycle.len()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn max_round(&self) -> Option<u32> {
        match self.limit {
            RoundLimit::Bounded(max) => Some(max),
            RoundLimit::Unbounded => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn stimulus(&self) -> Option<&S::Stimulus> {
        self.stimulus.as_ref()
    }

    /// Deadline of the pending timed transition, if any
    pub fn pending_until(&self) -> Option<Millis> {
        self.timer.due()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<P: std::fmt::Debug + 'static, S: StimulusSource> std::fmt::Debug for PhaseMachine<P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseMachine")
            .field("phase", &self.cycle[self.index].phase)
            .field("round", &self.round)
            .field("limit", &self.limit)
            .field("finished", &self.finished)
            .field("stimulus", &self.stimulus)
            .field("timer", &self.timer)
            .finish()
    }
}
