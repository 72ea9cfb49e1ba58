//! Terminal host for the DEEP elicitation engine.
//!
//! # Architecture
//!
//! ```text
//! SurveyPage::load(question text) -> HostSession
//!                                       |
//!                        warm-up quiz (tutorial) unless skipped
//!                                       |
//!               begin -> [show pair, save_choice, next_question]* -> serialize
//! ```
//!
//! The engine in [`deep_core`] is pure; everything here is presentation and IO.

mod console;
pub mod host;
pub mod page;
pub mod tutorial;

pub use console::Console;
pub use host::{HostError, HostSession, Placement};
pub use page::{PageError, SurveyPage};
