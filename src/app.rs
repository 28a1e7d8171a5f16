//! Navigation and input handling. The app owns every exercise, the session
//! clock, the result history and the generation worker; the UI only reads it.

use std::ops::RangeInclusive;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::column::ColumnReader;
use crate::config::Config;
use crate::exercise::{
    flash_drill, FlashDrill, PeripheralGrid, SchulteTable, ViewFieldPhase, ViewFieldTest,
};
use crate::generation::{ContentGenerator, GenerationWorker, Job, Output, TextLength};
use crate::playback::Playback;
use crate::results::{now_epoch_ms, ResultHistory};
use crate::scheduler::Millis;
use crate::session_timer::SessionTimer;
use crate::speed_test::{SpeedTest, TestStep};
use crate::stimulus::LanguagePack;
use crate::store::{KeyValueStore, USER_AGE_KEY};

pub const AGE_RANGE: RangeInclusive<u8> = 5..=120;
pub const DEFAULT_AGE: u8 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum AppView {
    Dashboard,
    #[strum(to_string = "Speed test")]
    SpeedTest,
    #[strum(to_string = "Flash words")]
    FlashWords,
    #[strum(to_string = "Peripheral grid")]
    PeripheralGrid,
    #[strum(to_string = "Schulte table")]
    SchulteTable,
    #[strum(to_string = "RSVP")]
    Rsvp,
    #[strum(to_string = "RSVP wall")]
    RsvpWall,
    #[strum(to_string = "Column reading")]
    ColumnReading,
    #[strum(to_string = "View field")]
    ViewField,
}

impl AppView {
    /// Dashboard entries, selected with digits 1-8
    pub const MENU: [AppView; 8] = [
        AppView::SpeedTest,
        AppView::FlashWords,
        AppView::PeripheralGrid,
        AppView::SchulteTable,
        AppView::Rsvp,
        AppView::RsvpWall,
        AppView::ColumnReading,
        AppView::ViewField,
    ];

    pub fn from_digit(c: char) -> Option<Self> {
        let n = c.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Self::MENU.get(i).copied())
    }
}

/// State of the screen on display. Built fresh on every visit.
#[derive(Debug)]
pub enum Activity {
    Dashboard,
    SpeedTest(SpeedTest),
    Flash(FlashDrill),
    Grid(PeripheralGrid),
    Schulte(SchulteTable),
    Rsvp(Playback),
    Wall(Playback),
    Column(ColumnReader),
    ViewField(ViewFieldTest),
}

impl Activity {
    pub fn view(&self) -> AppView {
        match self {
            Activity::Dashboard => AppView::Dashboard,
            Activity::SpeedTest(_) => AppView::SpeedTest,
            Activity::Flash(_) => AppView::FlashWords,
            Activity::Grid(_) => AppView::PeripheralGrid,
            Activity::Schulte(_) => AppView::SchulteTable,
            Activity::Rsvp(_) => AppView::Rsvp,
            Activity::Wall(_) => AppView::RsvpWall,
            Activity::Column(_) => AppView::ColumnReading,
            Activity::ViewField(_) => AppView::ViewField,
        }
    }
}

pub fn clamp_age(age: u8) -> u8 {
    let clamped = age.clamp(*AGE_RANGE.start(), *AGE_RANGE.end());
    if clamped != age {
        tracing::debug!(requested = age, clamped, "age clamped");
    }
    clamped
}

pub struct App {
    pack: LanguagePack,
    config: Config,
    store: Box<dyn KeyValueStore>,
    history: ResultHistory,
    age: u8,
    custom_text: Option<String>,
    timer: SessionTimer,
    worker: GenerationWorker,
    activity: Activity,
    notice: Option<String>,
    now: Millis,
    epoch_ms: i64,
    should_quit: bool,
}

impl App {
    pub fn new(
        pack: LanguagePack,
        config: Config,
        store: Box<dyn KeyValueStore>,
        generator: Arc<dyn ContentGenerator>,
    ) -> Self {
        let history = ResultHistory::load(store.as_ref());
        let age = load_age(store.as_ref());
        let mut timer = SessionTimer::new();
        timer.observe_module(&AppView::Dashboard.to_string());
        Self {
            pack,
            config,
            store,
            history,
            age,
            custom_text: None,
            timer,
            worker: GenerationWorker::new(generator),
            activity: Activity::Dashboard,
            notice: None,
            now: 0,
            epoch_ms: now_epoch_ms(),
            should_quit: false,
        }
    }

    /// Text used by the reading exercises instead of the bundled samples
    pub fn with_custom_text(mut self, text: String) -> Self {
        self.custom_text = Some(text);
        self
    }

    pub fn open(&mut self, view: AppView, now: Millis) {
        self.now = now;
        self.worker.cancel();
        self.notice = None;
        self.persist_settings();
        self.activity = match view {
            AppView::Dashboard => Activity::Dashboard,
            AppView::SpeedTest => {
                self.worker.request(Job::ReadingTest, self.age);
                Activity::SpeedTest(SpeedTest::new())
            }
            AppView::FlashWords => Activity::Flash(flash_drill(&self.pack)),
            AppView::PeripheralGrid => {
                let mut grid = PeripheralGrid::new(now);
                grid.set_spacing(self.config.grid_spacing);
                Activity::Grid(grid)
            }
            AppView::SchulteTable => {
                Activity::Schulte(SchulteTable::new(self.config.schulte_size, now))
            }
            AppView::Rsvp => Activity::Rsvp(Playback::new(
                self.text_for(view),
                self.config.rsvp_wpm,
                1,
            )),
            AppView::RsvpWall => Activity::Wall(Playback::new(
                self.text_for(view),
                self.config.wall_wpm,
                self.config.chunk_size,
            )),
            AppView::ColumnReading => Activity::Column(ColumnReader::new(
                self.text_for(view),
                self.config.column_width,
            )),
            AppView::ViewField => Activity::ViewField(ViewFieldTest::new(&self.pack)),
        };
        self.timer.observe_module(&view.to_string());
        tracing::info!(view = %view, "opened");
    }

    fn text_for(&self, view: AppView) -> &str {
        if let Some(text) = &self.custom_text {
            return text;
        }
        let texts = &self.pack.default_texts;
        match view {
            AppView::RsvpWall => &texts.wall,
            AppView::ColumnReading => &texts.column,
            _ => &texts.rsvp,
        }
    }

    /// Carries per-exercise settings back into the config before leaving
    fn persist_settings(&mut self) {
        match &self.activity {
            Activity::Rsvp(p) => self.config.rsvp_wpm = p.wpm(),
            Activity::Wall(p) => {
                self.config.wall_wpm = p.wpm();
                self.config.chunk_size = p.chunk_size();
            }
            Activity::Column(c) => self.config.column_width = c.width(),
            Activity::Schulte(s) => self.config.schulte_size = s.size(),
            Activity::Grid(g) => self.config.grid_spacing = g.spacing(),
            _ => {}
        }
    }

    pub fn on_tick(&mut self, now: Millis) {
        self.now = now;
        self.epoch_ms = now_epoch_ms();
        self.timer.on_time(now);
        match &mut self.activity {
            Activity::Flash(drill) => {
                drill.on_tick(now);
            }
            Activity::Schulte(table) => table.on_tick(now),
            Activity::Rsvp(p) | Activity::Wall(p) => {
                p.on_tick(now);
            }
            Activity::ViewField(test) => {
                test.on_tick(now);
            }
            _ => {}
        }
        if let Some(output) = self.worker.poll() {
            self.deliver(output);
        }
    }

    fn deliver(&mut self, output: Output) {
        match (output, &mut self.activity) {
            (Output::Text(Ok(text)), Activity::Rsvp(p) | Activity::Wall(p)) => {
                p.pause();
                p.set_text(&text);
            }
            (Output::Text(Ok(text)), Activity::Column(c)) => c.set_text(&text),
            (Output::Text(Err(e)), _) => {
                tracing::warn!(error = %e, "text generation failed");
                self.notice = Some(format!("{e} (s/m/l to try again)"));
            }
            (Output::ReadingTest(outcome), Activity::SpeedTest(test)) => test.loaded(outcome),
            (_, activity) => {
                tracing::debug!(view = %activity.view(), "generation result has no taker");
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Millis) {
        self.now = now;
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match key.code {
            KeyCode::F(2) => return self.timer.toggle_active(now),
            KeyCode::F(3) => return self.timer.reset_session(),
            KeyCode::Esc => {
                if self.activity.view() == AppView::Dashboard {
                    self.should_quit = true;
                } else {
                    self.open(AppView::Dashboard, now);
                }
                return;
            }
            _ => {}
        }

        match &mut self.activity {
            Activity::Dashboard => self.dashboard_key(key.code, now),
            Activity::SpeedTest(_) => self.speed_test_key(key.code, now),
            Activity::Flash(drill) => match key.code {
                KeyCode::Char(' ') | KeyCode::Enter => {
                    if drill.is_finished() {
                        drill.restart(now);
                    } else if drill.is_initial() {
                        drill.start_round(now);
                    } else if drill.is_final_phase() {
                        drill.next_round(now);
                    }
                }
                KeyCode::Char('r') => drill.restart(now),
                _ => {}
            },
            Activity::Grid(grid) => match key.code {
                KeyCode::Char(' ') | KeyCode::Enter => {
                    if grid.is_finished() {
                        grid.restart(now);
                    } else {
                        grid.next_table(now);
                    }
                }
                KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => grid.widen(),
                KeyCode::Char('-') | KeyCode::Left => grid.narrow(),
                KeyCode::Char('r') => grid.restart(now),
                _ => {}
            },
            Activity::Schulte(table) => match key.code {
                KeyCode::Char(c) if c.is_ascii_digit() => table.push_digit(c),
                KeyCode::Backspace => table.pop_digit(),
                KeyCode::Enter => {
                    table.submit_entry(now);
                }
                KeyCode::Tab => table.cycle_size(now),
                KeyCode::Char('r') => table.restart(now),
                _ => {}
            },
            Activity::Rsvp(p) => {
                if !playback_key(p, key.code, now, false) {
                    if let KeyCode::Char(c) = key.code {
                        self.text_key(c);
                    }
                }
            }
            Activity::Wall(p) => {
                if !playback_key(p, key.code, now, true) {
                    if let KeyCode::Char(c) = key.code {
                        self.text_key(c);
                    }
                }
            }
            Activity::Column(column) => match key.code {
                KeyCode::Up => column.scroll_by(-1),
                KeyCode::Down => column.scroll_by(1),
                KeyCode::PageUp => column.scroll_by(-10),
                KeyCode::PageDown => column.scroll_by(10),
                KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => column.widen(),
                KeyCode::Char('-') | KeyCode::Left => column.narrow(),
                KeyCode::Char(c) => self.text_key(c),
                _ => {}
            },
            Activity::ViewField(test) => match (test.phase(), key.code) {
                (ViewFieldPhase::Ready, KeyCode::Char(' ') | KeyCode::Enter) => {
                    test.show(now);
                }
                (ViewFieldPhase::Input, KeyCode::Enter) => {
                    test.submit(now);
                }
                (ViewFieldPhase::Input, KeyCode::Backspace) => test.backspace(),
                (ViewFieldPhase::Input, KeyCode::Char(c)) => test.type_char(c),
                (ViewFieldPhase::Result, KeyCode::Enter | KeyCode::Char('r')) => {
                    test.restart(now)
                }
                _ => {}
            },
        }
    }

    fn dashboard_key(&mut self, code: KeyCode, now: Millis) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => {
                self.set_age(self.age.saturating_add(1))
            }
            KeyCode::Char('-') | KeyCode::Down => self.set_age(self.age.saturating_sub(1)),
            KeyCode::Char(c) => {
                if let Some(view) = AppView::from_digit(c) {
                    self.open(view, now);
                }
            }
            _ => {}
        }
    }

    /// Generation shortcuts shared by the reading screens
    fn text_key(&mut self, c: char) {
        let length = match c {
            's' => TextLength::Short,
            'm' => TextLength::Medium,
            'l' => TextLength::Long,
            _ => return,
        };
        if self.worker.is_pending() {
            return;
        }
        self.notice = None;
        self.worker.request(Job::Text(length), self.age);
    }

    fn speed_test_key(&mut self, code: KeyCode, now: Millis) {
        let Activity::SpeedTest(test) = &mut self.activity else {
            return;
        };
        match (test.step().clone(), code) {
            (TestStep::Failed(_), KeyCode::Enter | KeyCode::Char('r')) => {
                if test.retry() {
                    self.worker.request(Job::ReadingTest, self.age);
                }
            }
            (TestStep::Prepare, KeyCode::Enter | KeyCode::Char(' ')) => {
                test.start_reading(now);
            }
            (TestStep::Reading, KeyCode::Enter | KeyCode::Char(' ')) => {
                test.stop_reading(now);
            }
            (TestStep::Reading | TestStep::Stopped, KeyCode::Up) => test.scroll_by(-1),
            (TestStep::Reading | TestStep::Stopped, KeyCode::Down) => test.scroll_by(1),
            (TestStep::Stopped, KeyCode::Enter) => {
                test.open_quiz();
            }
            (TestStep::Quiz, KeyCode::Up) => test.select_prev(),
            (TestStep::Quiz, KeyCode::Down) => test.select_next(),
            (TestStep::Quiz, KeyCode::Char(c @ 'a'..='d')) => test.choose(c as usize - 'a' as usize),
            (TestStep::Quiz, KeyCode::Char(c @ '1'..='4')) => test.choose(c as usize - '1' as usize),
            (TestStep::Quiz, KeyCode::Enter) => {
                if let Some(result) = test.submit(now_epoch_ms()) {
                    self.history.record(result);
                    if let Err(e) = self.history.save(self.store.as_ref()) {
                        tracing::warn!(error = %e, "could not save result history");
                    }
                }
            }
            (TestStep::Result, KeyCode::Enter) => self.open(AppView::Dashboard, now),
            _ => {}
        }
    }

    pub fn set_age(&mut self, age: u8) {
        self.age = clamp_age(age);
        if let Err(e) = self.store.set(USER_AGE_KEY, &self.age.to_string()) {
            tracing::warn!(error = %e, "could not save age");
        }
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn view(&self) -> AppView {
        self.activity.view()
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn history(&self) -> &ResultHistory {
        &self.history
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn is_generating(&self) -> bool {
        self.worker.is_pending()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn epoch_ms(&self) -> i64 {
        self.epoch_ms
    }

    pub fn pack(&self) -> &LanguagePack {
        &self.pack
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Writes settings changed on the current screen into the config
    pub fn sync_config(&mut self) {
        self.persist_settings();
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

/// Playback controls; false when the key is not one of them
fn playback_key(p: &mut Playback, code: KeyCode, now: Millis, chunked: bool) -> bool {
    match code {
        KeyCode::Char(' ') => p.toggle(now),
        KeyCode::Up => p.faster(),
        KeyCode::Down => p.slower(),
        KeyCode::Right if chunked => p.set_chunk_size(p.chunk_size() + 1),
        KeyCode::Left if chunked => p.set_chunk_size(p.chunk_size().saturating_sub(1)),
        KeyCode::Char('r') => p.reset(),
        _ => return false,
    }
    true
}

fn load_age(store: &dyn KeyValueStore) -> u8 {
    match store.get(USER_AGE_KEY) {
        Ok(Some(raw)) => match raw.trim().parse::<u16>() {
            Ok(age) => clamp_age(age.min(u8::MAX as u16) as u8),
            Err(_) => {
                tracing::warn!(value = %raw, "ignoring stored age");
                DEFAULT_AGE
            }
        },
        Ok(None) => DEFAULT_AGE,
        Err(e) => {
            tracing::warn!(error = %e, "could not read stored age");
            DEFAULT_AGE
        }
    }
}
