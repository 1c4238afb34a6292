// Library surface for headless/integration tests and reuse.
// Keep this lean: terminal setup, logging init and side effects live in main.rs.
pub mod alphabet;
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod matcher;
pub mod router;
pub mod runtime;
pub mod session;
pub mod share;
pub mod timer;
pub mod ui;
