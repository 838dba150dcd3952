// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod logging;
pub mod runtime;
pub mod scheduler;
pub mod session;
pub mod stats;
pub mod ui;
pub mod words;
