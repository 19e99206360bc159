//! Integration tests entry point
//!
//! This file serves as the entry point for the integration tests.
//! It includes the integration_tests module which contains:
//! - Full analysis pipeline tests over in-process fakes
//! - HTTP API tests against the router
//! - Degraded-collaborator scenarios

mod common;
mod integration_tests;
