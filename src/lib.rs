// Library surface for headless/integration tests and reuse.
// The binary in main.rs only wires the terminal to `App`.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod logging;
pub mod pack;
pub mod picker;
pub mod runtime;
pub mod scheduler;
pub mod session;
pub mod ui;

pub const TICK_RATE_MS: u64 = 100;
