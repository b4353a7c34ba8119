//! Tests for the chart generation pipeline.
//!
//! This module contains end-to-end tests for generation runs, including chart
//! aggregation and persistence, snapshot caching, failed member handling, run
//! aborts, and replacement of overlapping chart weeks.

mod failed_members;
mod full_run;
mod overlap;

use super::*;
