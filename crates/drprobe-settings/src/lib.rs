//! # drprobe-settings
//!
//! Configuration for a drprobe node, loaded from three layers (in priority
//! order):
//! 1. **Compiled defaults**: [`Settings::default()`]
//! 2. **Settings file**: optional JSON file (deep-merged over defaults)
//! 3. **Environment variables**: `DB_*`, `NODE_NAME`, `DRPROBE_*`
//!
//! The binary applies CLI flags on top and then treats the result as
//! immutable for the life of the process.

#![deny(unsafe_code)]

pub mod errors;
pub mod identity;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use identity::resolve_node_name;
pub use loader::{CONFIG_PATH_ENV, deep_merge, load_settings, load_settings_with};
pub use types::{DatabaseSettings, ServerSettings, Settings};
