//! Test helpers module
//!
//! This module provides utilities and helpers for testing the studio: a mock
//! backend server and shared test data.

#![allow(dead_code)]

pub mod backend_mock;
pub mod test_data;

pub use backend_mock::*;
pub use test_data::*;
