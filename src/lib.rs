// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod column;
pub mod config;
pub mod error;
pub mod exercise;
pub mod generation;
pub mod logging;
pub mod playback;
pub mod results;
pub mod runtime;
pub mod scheduler;
pub mod session_timer;
pub mod stimulus;
pub mod store;
pub mod ui;
pub mod util;
