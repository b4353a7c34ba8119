//! Server application core modules.
//!
//! This module contains all server-side functionality for the Chorus application, including
//! HTTP routing, database operations, the weekly chart generation pipeline, background tasks,
//! and scheduled maintenance jobs. It provides the complete backend infrastructure for turning
//! members' scrobble history into group charts, contribution stats, and listening records.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod model;
pub mod router;
pub mod scheduler;
pub mod scrobble;
pub mod service;
pub mod startup;
pub mod util;
pub mod worker;
