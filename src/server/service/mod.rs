//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer that implements business logic, coordinates
//! between repositories and the external scrobble service, and handles complex
//! multi-step operations. Services include per-member scoring, chart aggregation,
//! snapshot fetching with caching, the generation run orchestrator, derived
//! statistics, and retry logic.

pub mod aggregation;
pub mod analytics;
pub mod generation;
pub mod retry;
pub mod scoring;
pub mod snapshot;
pub mod stats;
