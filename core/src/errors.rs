//! Engine error types.
//!
//! `SequenceError` signals a host integration bug and is fatal.
//! `UserInputError` is recoverable: history is untouched and the host re-prompts.

use std::fmt;

use thiserror::Error;

use crate::engine::EngineState;
use crate::record::RecordError;

/// Engine operation names, used in sequence errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Begin,
    SaveChoice,
    NextQuestion,
    Serialize,
}

impl Operation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Operation::Begin => "begin",
            Operation::SaveChoice => "save_choice",
            Operation::NextQuestion => "next_question",
            Operation::Serialize => "serialize",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot call {operation} while {state}")]
pub struct SequenceError {
    pub operation: Operation,
    pub state: EngineState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UserInputError {
    #[error("Please answer this question.")]
    NoSelection,
    #[error("choice {0} is not one of the two options")]
    OutOfRange(u8),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    #[error(transparent)]
    UserInput(#[from] UserInputError),
    #[error("failed to encode record: {0}")]
    Record(#[from] RecordError),
}

impl EngineError {
    /// Only user input errors can be fixed by asking the subject again.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::UserInput(_))
    }
}
