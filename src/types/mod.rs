//! Public types for the Krishi Sakha API.

mod advice;
mod demo;

pub use advice::{Advice, AdviceResponse, AdviceSource};
pub use demo::{DemoQaEntry, DemoResponse, MatchResult};
