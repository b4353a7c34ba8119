//! Test fixture modules for database rows and HTTP mock creation.
//!
//! Each submodule hangs a fixture accessor off [`TestSetup`](crate::TestSetup)
//! so tests read as `test.group().insert_group(..)`:
//!
//! - `group` - chorus groups and their members
//! - `listening` - stored listening weeks and generated charts
//! - `scrobble` - mock endpoints simulating the scrobble service's weekly
//!   chart API

pub mod group;
pub mod listening;
pub mod scrobble;
