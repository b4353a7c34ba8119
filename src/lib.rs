//! Chorus generates weekly group listening charts from its members' scrobble
//! history.
//!
//! The crate is split into a thin shared [`model`] layer (API DTOs) and the
//! [`server`] tree containing HTTP routing, the chart generation pipeline,
//! database repositories, background tasks, and scheduled maintenance jobs.

pub mod model;
pub mod server;
