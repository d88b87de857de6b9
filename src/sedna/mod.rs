//! Client and extractors for the Sedna scheduling portal.

pub mod client;
pub mod decode;
pub mod document;
pub mod errors;
pub mod extract;
pub mod hierarchy;
pub mod models;
pub mod months;
pub mod schedule;
pub mod spacer;

pub use client::{DEFAULT_BASE_URL, SednaClient};
pub use errors::SednaError;
pub use hierarchy::{Level, Selection};
pub use models::*;
pub use schedule::{extract_schedule, extract_schedule_in_year};
