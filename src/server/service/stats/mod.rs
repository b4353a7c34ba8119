//! Statistics derived from finalized weekly charts.
//!
//! Entry history and member contributions are maintained incrementally inside the
//! same transaction that persists each week, so they only ever move forward by
//! deltas. The all-time ranking, chart movement, group records, and the group icon
//! are recomputed from stored rows instead. Each service here also exposes the full
//! rebuild used by the deferred statistics task to repair any accumulated drift.

pub mod alltime;
pub mod contribution;
pub mod entry_history;
pub mod icon;
pub mod movement;
pub mod records;
