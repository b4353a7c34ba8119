//! Tests for the service layer.
//!
//! This module contains integration tests for the chart generation pipeline,
//! exercising full runs against a mock scrobble server and an in-memory database.

mod generation;

use chorus_test_utils::prelude::*;

use crate::util::{fast_policy, generation_service, wait_until_idle, TestSetupExt};
