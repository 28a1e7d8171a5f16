use crate::scheduler::{Millis, Periodic};

pub const SECOND_MS: Millis = 1_000;

/// Session and per-module elapsed seconds shown in the header. Owned by the
/// app and handed to the renderer; nothing else mutates it.
#[derive(Debug)]
pub struct SessionTimer {
    session_secs: u64,
    module_secs: u64,
    active: bool,
    module: Option<String>,
    clock: Periodic,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTimer {
    /// Starts active, like the header clock does on launch
    pub fn new() -> Self {
        Self {
            session_secs: 0,
            module_secs: 0,
            active: true,
            module: None,
            clock: Periodic::new(SECOND_MS),
        }
    }

    pub fn tick(&mut self) {
        if self.active {
            self.session_secs += 1;
            self.module_secs += 1;
        }
    }

    /// Feeds one `tick` per whole second elapsed since the last call
    pub fn on_time(&mut self, now: Millis) {
        for _ in 0..self.clock.poll(now) {
            self.tick();
        }
    }

    /// Resuming starts a fresh second so a pause never leaks a partial one
    pub fn set_active(&mut self, active: bool, now: Millis) {
        if active && !self.active {
            self.clock.restart(now);
        }
        self.active = active;
    }

    pub fn toggle_active(&mut self, now: Millis) {
        self.set_active(!self.active, now);
    }

    pub fn reset_session(&mut self) {
        self.session_secs = 0;
        self.module_secs = 0;
    }

    pub fn observe_module(&mut self, id: &str) {
        if self.module.as_deref() != Some(id) {
            self.module = Some(id.to_string());
            self.module_secs = 0;
        }
    }

    pub fn session_secs(&self) -> u64 {
        self.session_secs
    }

    pub fn module_secs(&self) -> u64 {
        self.module_secs
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// `m:ss`, minutes unbounded
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_count_only_while_active() {
        let mut timer = SessionTimer::new();
        timer.tick();
        timer.tick();
        assert_eq!(timer.session_secs(), 2);

        timer.set_active(false, 0);
        for _ in 0..5 {
            timer.tick();
        }
        assert_eq!(timer.session_secs(), 2);
        assert_eq!(timer.module_secs(), 2);

        timer.toggle_active(0);
        timer.tick();
        assert_eq!(timer.session_secs(), 3);
    }

    #[test]
    fn module_change_resets_module_clock_only() {
        let mut timer = SessionTimer::new();
        timer.observe_module("Dashboard");
        timer.tick();
        timer.tick();
        timer.observe_module("Dashboard");
        assert_eq!(timer.module_secs(), 2);

        timer.observe_module("Schulte");
        assert_eq!(timer.module_secs(), 0);
        assert_eq!(timer.session_secs(), 2);
        timer.tick();
        assert_eq!(timer.module_secs(), 1);
        assert_eq!(timer.session_secs(), 3);
    }

    #[test]
    fn reset_zeroes_both() {
        let mut timer = SessionTimer::new();
        timer.tick();
        timer.reset_session();
        assert_eq!(timer.session_secs(), 0);
        assert_eq!(timer.module_secs(), 0);
        assert!(timer.is_active());
    }

    #[test]
    fn wall_time_drives_whole_seconds() {
        let mut timer = SessionTimer::new();
        timer.on_time(0);
        timer.on_time(999);
        assert_eq!(timer.session_secs(), 0);
        timer.on_time(1_000);
        assert_eq!(timer.session_secs(), 1);
        timer.on_time(3_500);
        assert_eq!(timer.session_secs(), 3);

        timer.set_active(false, 3_500);
        timer.on_time(9_000);
        assert_eq!(timer.session_secs(), 3);

        timer.set_active(true, 9_200);
        timer.on_time(10_100);
        assert_eq!(timer.session_secs(), 3);
        timer.on_time(10_200);
        assert_eq!(timer.session_secs(), 4);
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(59), "0:59");
        assert_eq!(format_clock(61), "1:01");
        assert_eq!(format_clock(3_600), "60:00");
    }
}
