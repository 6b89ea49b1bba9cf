//! Integration test suite for mcp-provision
//!
//! Every test drives the compiled binary against a throwaway home directory.
//! The binary's `PATH` holds only a private bin directory, so `npm` is absent
//! (soft-skipped) and the registration CLI is a small shell script that logs
//! what it was asked to do.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **install**: idempotency, key gating, JSON merging, profile block
//! - **registration**: `mcp list` / `mcp add` behaviour and failures
//! - **status**: read-only status output
//! - **config_cmd**: `config init | show | path`

#![cfg(unix)]

mod common;
mod config_cmd;
mod install;
mod registration;
mod status;
