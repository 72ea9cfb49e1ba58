//! Core elicitation logic for DEEP.
//!
//! This crate owns everything with real state or arithmetic:
//! the [`ElicitationEngine`] state machine, the staircase
//! [`StimulusGenerator`], the converged [`IndifferenceEstimate`],
//! and the canonical result [`record`] codec.
//!
//! It performs no IO. Hosts render steps, collect picks, and store the record.

mod engine;
pub mod errors;
mod estimate;
pub mod record;
mod staircase;

pub use engine::{CompletedSession, ElicitationEngine, EngineState, Question};
pub use errors::{EngineError, Operation, SequenceError, UserInputError};
pub use estimate::{IndifferenceEstimate, RiskAttitude};
pub use record::{RECORD_FORMAT, RECORD_VERSION, RecordError};
pub use staircase::{Bracket, StimulusGenerator};
