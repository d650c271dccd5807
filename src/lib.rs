// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod matcher;
pub mod runtime;
pub mod scheduler;
pub mod session;
pub mod stats;
pub mod ui;
pub mod vocabulary;
pub mod word_stream;

/// How long the event loop waits for input before redrawing
pub const TICK_RATE_MS: u64 = 16;
