//! Tests for HTTP controller endpoints.
//!
//! This module contains integration tests for the application's HTTP controllers,
//! verifying request handling, response status codes, and error handling for the
//! chart, generation, and statistics endpoints.

mod chart;

use chorus_test_utils::prelude::*;

use crate::util::{generation_service, wait_until_idle, TestSetupExt};
