//! Tests for chart controller endpoints.
//!
//! This module contains integration tests for chart-related HTTP endpoints,
//! including generation control, status reporting, chart lookups, contribution
//! listings, records, and statistics rebuilds.

mod generate_charts;
mod get_contributions;
mod get_generation_status;
mod get_latest_charts;
mod get_records;
mod get_week_charts;
mod rebuild_stats;

use super::*;
