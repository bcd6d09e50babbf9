//! Configuration loading
//!
//! `GYMTRACK_*` environment variables take precedence over a probed
//! `gymtrack.toml` / `gymtrack.json`; defaults fill the rest.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
