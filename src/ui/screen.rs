use ratatui::{buffer::Buffer, layout::Rect};

use crate::app::{Activity, App};
use crate::column::ColumnReader;
use crate::exercise::{FlashDrill, PeripheralGrid, SchulteTable, ViewFieldTest};
use crate::playback::Playback;
use crate::speed_test::SpeedTest;

use super::{dashboard, drills, reading, speed_test};

/// A UI screen boundary: draws the body of one view and names its keys
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
    fn legend(&self) -> &'static str;
}

pub struct DashboardScreen;

impl Screen for DashboardScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        dashboard::render(app, area, buf);
    }

    fn legend(&self) -> &'static str {
        "(1-8) exercise / (+/-) age / (f2) pause clock / (f3) reset clock / (q)uit"
    }
}

pub struct SpeedTestScreen<'a>(pub &'a SpeedTest);

impl Screen for SpeedTestScreen<'_> {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        speed_test::render(self.0, app.now(), area, buf);
    }

    fn legend(&self) -> &'static str {
        speed_test::legend(self.0)
    }
}

pub struct FlashScreen<'a>(pub &'a FlashDrill);

impl Screen for FlashScreen<'_> {
    fn render(&self, _app: &App, area: Rect, buf: &mut Buffer) {
        drills::render_flash(self.0, area, buf);
    }

    fn legend(&self) -> &'static str {
        "(space) next / (r)estart / (esc) menu"
    }
}

pub struct GridScreen<'a>(pub &'a PeripheralGrid);

impl Screen for GridScreen<'_> {
    fn render(&self, _app: &App, area: Rect, buf: &mut Buffer) {
        drills::render_grid(self.0, area, buf);
    }

    fn legend(&self) -> &'static str {
        "(space) next table / (+/-) spacing / (r)estart / (esc) menu"
    }
}

pub struct SchulteScreen<'a>(pub &'a SchulteTable);

impl Screen for SchulteScreen<'_> {
    fn render(&self, _app: &App, area: Rect, buf: &mut Buffer) {
        drills::render_schulte(self.0, area, buf);
    }

    fn legend(&self) -> &'static str {
        "(digits+enter) pick number / (tab) size / (r)estart / (esc) menu"
    }
}

pub struct ViewFieldScreen<'a>(pub &'a ViewFieldTest);

impl Screen for ViewFieldScreen<'_> {
    fn render(&self, _app: &App, area: Rect, buf: &mut Buffer) {
        drills::render_view_field(self.0, area, buf);
    }

    fn legend(&self) -> &'static str {
        "(space) show / type + (enter) answer / (r)estart after a miss / (esc) menu"
    }
}

pub struct RsvpScreen<'a>(pub &'a Playback);

impl Screen for RsvpScreen<'_> {
    fn render(&self, _app: &App, area: Rect, buf: &mut Buffer) {
        reading::render_rsvp(self.0, area, buf);
    }

    fn legend(&self) -> &'static str {
        "(space) play/pause / (up/down) wpm / (r)eset / (s/m/l) new text / (esc) menu"
    }
}

pub struct WallScreen<'a>(pub &'a Playback);

impl Screen for WallScreen<'_> {
    fn render(&self, _app: &App, area: Rect, buf: &mut Buffer) {
        reading::render_wall(self.0, area, buf);
    }

    fn legend(&self) -> &'static str {
        "(space) play/pause / (up/down) wpm / (left/right) chunk / (r)eset / (s/m/l) new text"
    }
}

pub struct ColumnScreen<'a>(pub &'a ColumnReader);

impl Screen for ColumnScreen<'_> {
    fn render(&self, _app: &App, area: Rect, buf: &mut Buffer) {
        reading::render_column(self.0, area, buf);
    }

    fn legend(&self) -> &'static str {
        "(up/down/pgup/pgdn) scroll / (+/-) width / (s/m/l) new text / (esc) menu"
    }
}

/// Screen for whatever is currently on display
pub fn current_screen(activity: &Activity) -> Box<dyn Screen + '_> {
    match activity {
        Activity::Dashboard => Box::new(DashboardScreen),
        Activity::SpeedTest(test) => Box::new(SpeedTestScreen(test)),
        Activity::Flash(drill) => Box::new(FlashScreen(drill)),
        Activity::Grid(grid) => Box::new(GridScreen(grid)),
        Activity::Schulte(table) => Box::new(SchulteScreen(table)),
        Activity::Rsvp(playback) => Box::new(RsvpScreen(playback)),
        Activity::Wall(playback) => Box::new(WallScreen(playback)),
        Activity::Column(reader) => Box::new(ColumnScreen(reader)),
        Activity::ViewField(test) => Box::new(ViewFieldScreen(test)),
    }
}
