//! Exam archive aggregation.
//!
//! The aggregation pipeline: walk the exam directory tree, parse each
//! `.json`/`.jsonc` file, and group the results by subject.

pub mod aggregate;
pub mod parser;

pub use aggregate::{aggregate, AggregateError, ExamEntry, Subject};
pub use parser::{Format, ParseError};
