//! Hoist Common Library
//!
//! Shared types for the hoist simulator and every collaborator that reads
//! its output (renderers, telemetry, host loops).
//!
//! # Module Structure
//!
//! - [`plant`] - Immutable plant parameters with defaults and validation
//! - [`state`] - Published `PlantState` snapshot, trip/command/direction enums
//! - [`interlock`] - Limit switch overrides and overload windows
//! - [`config`] - TOML configuration loading
//! - [`consts`] - Physical and drive constants
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```toml
//! [dependencies]
//! hoist_common = { path = "../hoist_common" }
//! ```
//!
//! ```rust
//! use hoist_common::prelude::*;
//!
//! let params = PlantParams::default();
//! assert!(params.validate().is_ok());
//! ```

pub mod config;
pub mod consts;
pub mod interlock;
pub mod plant;
pub mod prelude;
pub mod state;
