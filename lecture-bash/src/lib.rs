//! # Lecture Bash
//!
//! Finds lectures during which at least two people of a group are free, so
//! that they can drop in together.
//!
//! The crate reads a free-times spreadsheet into an [`AvailabilityIndex`],
//! pages through the published timetables of the study information system,
//! matches every lecture start against the index and writes the matching
//! lectures back to a spreadsheet.
//!
//! ## Architecture
//!
//! - [`models`]: time parsing, the availability index, API payloads and result rows
//! - [`clients`]: timetable API and spreadsheet store traits with HTTP and in-memory implementations
//! - [`services`]: eligibility filters, per-course processing and the plan driver
//! - [`config`]: TOML configuration with environment overrides
//! - [`error`]: the crate error type
//!
//! [`AvailabilityIndex`]: models::AvailabilityIndex

// BashError carries a full ErrorContext in every variant
#![allow(clippy::result_large_err)]

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::AppConfig;
pub use error::{BashError, BashResult, ErrorContext};
