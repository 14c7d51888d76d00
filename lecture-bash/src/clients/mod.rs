//! Remote collaborators behind async traits.
//!
//! ```text
//! ┌──────────────────────────────┐     ┌──────────────────────────────┐
//! │ TimetableApi                 │     │ SpreadsheetStore             │
//! │  - OisClient (HTTP)          │     │  - GoogleSheetsClient (HTTP) │
//! │  - LocalTimetableApi (tests) │     │  - LocalSpreadsheet (tests)  │
//! └──────────────────────────────┘     └──────────────────────────────┘
//! ```
//!
//! Implementations must be `Send + Sync`; the pipeline only ever borrows
//! them.

pub mod local;
pub mod sheets;
pub mod timetable;

pub use local::{LocalSpreadsheet, LocalTimetableApi, RegistrationFixture};
pub use sheets::{GoogleSheetsClient, SpreadsheetStore};
pub use timetable::{OisClient, TimetableApi};
