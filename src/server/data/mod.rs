//! Data access layer repositories.
//!
//! This module contains all database repository implementations for the application.
//! Repositories provide an abstraction layer over database operations, organizing
//! data access by domain (groups and members, weekly listening data, generated charts,
//! derived statistics, and generation run state).
//!
//! Repositories are generic over [`sea_orm::ConnectionTrait`] so the same methods work
//! on a plain connection or inside a transaction.

pub mod alltime;
pub mod chart;
pub mod contribution;
pub mod generation;
pub mod group;
pub mod history;
pub mod member;
pub mod record;
pub mod score;
pub mod snapshot;
