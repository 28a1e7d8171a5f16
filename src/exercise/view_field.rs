use crate::scheduler::Millis;
use crate::stimulus::{answer_matches, LanguagePack, SpanSource};

use super::machine::{PhaseMachine, PhaseSpec, RoundLimit};

pub const VIEW_FIELD_SHOW_MS: Millis = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ViewFieldPhase {
    Ready,
    Show,
    Input,
    Result,
}

static VIEW_FIELD_CYCLE: [PhaseSpec<ViewFieldPhase>; 4] = [
    PhaseSpec::user(ViewFieldPhase::Ready),
    PhaseSpec::timed(ViewFieldPhase::Show, VIEW_FIELD_SHOW_MS),
    PhaseSpec::user(ViewFieldPhase::Input),
    PhaseSpec::user(ViewFieldPhase::Result),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Level went up; back to `Ready`
    Correct { span: usize },
    /// Series over; `Result` shows the expected string
    Wrong,
    /// Not in the input phase
    NotAsked,
}

/// Span test: the string for the current level flashes for 400 ms, then the
/// user types it back. A correct answer raises the level, a wrong one ends
/// the series.
#[derive(Debug)]
pub struct ViewFieldTest {
    machine: PhaseMachine<ViewFieldPhase, SpanSource>,
    input: String,
    max_span: usize,
}

impl ViewFieldTest {
    pub fn new(pack: &LanguagePack) -> Self {
        Self {
            machine: PhaseMachine::new(
                &VIEW_FIELD_CYCLE,
                SpanSource::new(pack.span_words.clone()),
                RoundLimit::Unbounded,
            ),
            input: String::new(),
            max_span: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.machine = self.machine.with_seed(seed);
        self
    }

    /// Flashes the string for the current level
    pub fn show(&mut self, now: Millis) -> bool {
        self.input.clear();
        self.machine.start_round(now)
    }

    pub fn on_tick(&mut self, now: Millis) -> bool {
        self.machine.on_tick(now)
    }

    pub fn type_char(&mut self, c: char) {
        if self.phase() == ViewFieldPhase::Input {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.phase() == ViewFieldPhase::Input {
            self.input.pop();
        }
    }

    pub fn submit(&mut self, now: Millis) -> Verdict {
        if self.phase() != ViewFieldPhase::Input {
            return Verdict::NotAsked;
        }
        let shown = self.machine.stimulus().cloned().unwrap_or_default();
        if answer_matches(&shown, &self.input) {
            let span = shown.chars().count();
            self.max_span = self.max_span.max(span);
            tracing::debug!(level = self.level(), span, "view field answer correct");
            self.input.clear();
            self.machine.next_round(now);
            Verdict::Correct { span }
        } else {
            self.machine.advance(now);
            Verdict::Wrong
        }
    }

    /// Level 1 and a zeroed high-water mark
    pub fn restart(&mut self, now: Millis) {
        self.machine.restart(now);
        self.input.clear();
        self.max_span = 0;
    }

    pub fn phase(&self) -> ViewFieldPhase {
        self.machine.phase()
    }

    pub fn level(&self) -> u32 {
        self.machine.round()
    }

    pub fn max_span(&self) -> usize {
        self.max_span
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// The flashed string, while it is on screen or after a miss
    pub fn visible(&self) -> Option<&str> {
        match self.phase() {
            ViewFieldPhase::Show | ViewFieldPhase::Result => {
                self.machine.stimulus().map(String::as_str)
            }
            ViewFieldPhase::Ready | ViewFieldPhase::Input => None,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.machine.stimulus().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stimulus::SupportedLanguage;

    fn test() -> ViewFieldTest {
        ViewFieldTest::new(&LanguagePack::load(SupportedLanguage::Polish).unwrap()).with_seed(11)
    }

    fn type_str(t: &mut ViewFieldTest, s: &str) {
        s.chars().for_each(|c| t.type_char(c));
    }

    #[test]
    fn flash_lasts_four_hundred_ms() {
        let mut t = test();
        assert_eq!(t.phase(), ViewFieldPhase::Ready);
        assert!(t.show(1_000));
        assert_eq!(t.phase(), ViewFieldPhase::Show);
        assert!(t.visible().is_some());

        t.on_tick(1_399);
        assert_eq!(t.phase(), ViewFieldPhase::Show);
        t.on_tick(1_400);
        assert_eq!(t.phase(), ViewFieldPhase::Input);
        assert_eq!(t.visible(), None);
    }

    #[test]
    fn typing_only_counts_during_input() {
        let mut t = test();
        t.type_char('x');
        assert_eq!(t.input(), "");
        assert_eq!(t.submit(0), Verdict::NotAsked);

        t.show(0);
        t.type_char('x');
        assert_eq!(t.input(), "");
        t.on_tick(400);
        t.type_char('x');
        t.type_char('y');
        t.backspace();
        assert_eq!(t.input(), "x");
    }

    #[test]
    fn correct_answer_raises_level_and_span() {
        let mut t = test();
        t.show(0);
        t.on_tick(400);
        let shown = t.current().unwrap().to_uppercase();
        type_str(&mut t, &shown);

        let verdict = t.submit(500);
        let span = shown.chars().count();
        assert_eq!(verdict, Verdict::Correct { span });
        assert_eq!(t.level(), 2);
        assert_eq!(t.max_span(), span);
        assert_eq!(t.phase(), ViewFieldPhase::Ready);
        assert_eq!(t.current(), None);
    }

    #[test]
    fn span_is_a_high_water_mark() {
        let mut t = test();
        let mut now = 0;
        let mut best = 0;
        for _ in 0..12 {
            t.show(now);
            now += VIEW_FIELD_SHOW_MS;
            t.on_tick(now);
            let shown = t.current().unwrap().to_string();
            best = best.max(shown.chars().count());
            type_str(&mut t, &shown);
            t.submit(now);
            assert_eq!(t.max_span(), best);
        }
        assert_eq!(t.level(), 13);
    }

    #[test]
    fn wrong_answer_shows_result_until_restart() {
        let mut t = test();
        t.show(0);
        t.on_tick(400);
        type_str(&mut t, "zzzz");
        assert_eq!(t.submit(500), Verdict::Wrong);
        assert_eq!(t.phase(), ViewFieldPhase::Result);
        assert!(t.visible().is_some());
        assert!(!t.show(600));

        t.restart(700);
        assert_eq!(t.phase(), ViewFieldPhase::Ready);
        assert_eq!(t.level(), 1);
        assert_eq!(t.max_span(), 0);
    }
}
