//! Test helper utilities
//!
//! Shared utilities for testing agri-ui

#![allow(dead_code)]

pub mod mock_backend;

pub use mock_backend::{spawn_mock_backend, MockBackend};
