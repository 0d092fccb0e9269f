//! API client library for nhkpg.
//!
//! Provides a blocking client for the NHK Program Guide API.

/// NHK Program Guide API client.
pub mod nhk;
