//! Pipeline services.
//!
//! The [`plan_driver`] pages through timetable searches and fans each
//! timetable's courses out to the [`course_processor`], which consults the
//! [`filters`] and builds spreadsheet [`links`]. [`publish`] writes the
//! result to the output sheet.

pub mod course_processor;
pub mod filters;
pub mod links;
pub mod plan_driver;
pub mod publish;

pub use course_processor::{process_course, CourseOutcome, ProcessingContext};
pub use filters::EligibilityFilter;
pub use links::{hyperlink, LinkBuilder};
pub use plan_driver::{PlanDriver, RunSummary};
pub use publish::publish;
