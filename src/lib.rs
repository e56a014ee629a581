// Library target so integration tests can import the module tree via
// `phrasr::engine::*` / `phrasr::session::*`. The CLI in main.rs builds on
// the same modules.
pub mod config;
pub mod engine;
pub mod session;
pub mod store;
