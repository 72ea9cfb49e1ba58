//! The elicitation state machine.
//!
//! ```text
//! Uninitialized --begin--> AwaitingResponse(0)
//! AwaitingResponse(i) --save_choice--> ChoiceRecorded(i)
//! ChoiceRecorded(i) --next_question--> AwaitingResponse(i + 1) | Complete
//! ```
//!
//! Any other call fails with [`SequenceError`] and leaves the engine untouched.

use std::fmt;

use deep_types::{
    Choice, ConfigurationError, Procedure, ProcedureKind, Response, Step, StepIndex,
};

use crate::errors::{EngineError, Operation, SequenceError, UserInputError};
use crate::estimate::IndifferenceEstimate;
use crate::record;
use crate::staircase::{Bracket, StimulusGenerator};

/// Externally visible engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    /// Step `i` is on screen, waiting for the subject.
    AwaitingResponse(StepIndex),
    /// Step `i` was answered; the host must call `next_question`.
    ChoiceRecorded(StepIndex),
    Complete,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::Uninitialized => f.write_str("uninitialized"),
            EngineState::AwaitingResponse(index) => {
                write!(f, "awaiting a response to step {index}")
            }
            EngineState::ChoiceRecorded(index) => write!(f, "holding the answer to step {index}"),
            EngineState::Complete => f.write_str("complete"),
        }
    }
}

/// Result of [`ElicitationEngine::next_question`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    Next(Step),
    /// Terminal sentinel: every step has been answered.
    Complete,
}

#[derive(Debug, Clone)]
enum Phase {
    Uninitialized,
    Awaiting(Step),
    Recorded,
    Complete,
}

/// Adaptive engine for one subject and one procedure.
///
/// Owns the response history exclusively. Abandoning a session is just dropping it.
#[derive(Debug, Clone)]
pub struct ElicitationEngine {
    procedure: Procedure,
    generator: StimulusGenerator,
    history: Vec<Response>,
    bracket: Bracket,
    phase: Phase,
}

impl ElicitationEngine {
    #[must_use]
    pub fn new(procedure: Procedure) -> Self {
        let generator = StimulusGenerator::new(procedure.kind());
        Self {
            procedure,
            generator,
            history: Vec::with_capacity(procedure.step_count().as_usize()),
            bracket: generator.initial_bracket(),
            phase: Phase::Uninitialized,
        }
    }

    /// Validate raw configuration and construct the engine.
    pub fn try_new(kind: &str, step_count: u32) -> Result<Self, ConfigurationError> {
        Procedure::try_new(kind, step_count).map(Self::new)
    }

    /// Drive a fresh engine through `choices`, one save/next cycle each.
    ///
    /// A full-length sequence leaves the engine `Complete`; a shorter one leaves it
    /// awaiting the next response. More choices than steps is a sequence error.
    pub fn replay(procedure: Procedure, choices: &[Choice]) -> Result<Self, SequenceError> {
        let mut engine = Self::new(procedure);
        engine.begin()?;
        for &choice in choices {
            engine.record_choice(choice)?;
            engine.next_question()?;
        }
        Ok(engine)
    }

    #[must_use]
    pub const fn procedure(&self) -> Procedure {
        self.procedure
    }

    #[must_use]
    pub const fn is_time_variant(&self) -> bool {
        self.procedure.is_time_variant()
    }

    #[must_use]
    pub const fn is_risk_variant(&self) -> bool {
        self.procedure.is_risk_variant()
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        match &self.phase {
            Phase::Uninitialized => EngineState::Uninitialized,
            Phase::Awaiting(step) => EngineState::AwaitingResponse(step.index()),
            Phase::Recorded => EngineState::ChoiceRecorded(self.last_answered()),
            Phase::Complete => EngineState::Complete,
        }
    }

    #[must_use]
    pub fn history(&self) -> &[Response] {
        &self.history
    }

    /// The step on screen, if any.
    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        match &self.phase {
            Phase::Awaiting(step) => Some(step),
            Phase::Uninitialized | Phase::Recorded | Phase::Complete => None,
        }
    }

    /// Bracket implied by the answers so far.
    #[must_use]
    pub const fn bracket(&self) -> Bracket {
        self.bracket
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, Phase::Complete)
    }

    /// Start the session and return the first step.
    pub fn begin(&mut self) -> Result<Step, SequenceError> {
        if !matches!(self.phase, Phase::Uninitialized) {
            return Err(self.sequence_error(Operation::Begin));
        }

        self.history.clear();
        self.bracket = self.generator.initial_bracket();
        let step = self.present_next_step();
        tracing::debug!(procedure = %self.procedure, "elicitation started");
        Ok(step)
    }

    /// Record the subject's pick for the step on screen.
    ///
    /// `None` means nothing was selected. Both that and an out-of-range value are
    /// recoverable and leave the history untouched.
    pub fn save_choice(&mut self, selection: Option<u8>) -> Result<Response, EngineError> {
        if !matches!(self.phase, Phase::Awaiting(_)) {
            return Err(self.sequence_error(Operation::SaveChoice).into());
        }

        let choice = match selection {
            None => Err(UserInputError::NoSelection),
            Some(raw) => Choice::try_from(raw).map_err(|err| UserInputError::OutOfRange(err.0)),
        };
        let choice = match choice {
            Ok(choice) => choice,
            Err(err) => {
                tracing::warn!(state = %self.state(), "rejected selection: {err}");
                return Err(err.into());
            }
        };

        Ok(self.record_choice(choice)?)
    }

    /// Advance after a recorded choice.
    ///
    /// Returns [`Question::Complete`] once every step has been answered; calling it
    /// again after that is a sequence error.
    pub fn next_question(&mut self) -> Result<Question, SequenceError> {
        if !matches!(self.phase, Phase::Recorded) {
            return Err(self.sequence_error(Operation::NextQuestion));
        }

        if self.history.len() == self.procedure.step_count().as_usize() {
            self.phase = Phase::Complete;
            tracing::debug!(
                procedure = %self.procedure,
                lower = %self.bracket.lower(),
                upper = %self.bracket.upper(),
                "elicitation complete"
            );
            return Ok(Question::Complete);
        }

        Ok(Question::Next(self.present_next_step()))
    }

    /// Canonical record of the completed session.
    pub fn serialize(&self) -> Result<String, EngineError> {
        let session = self.completed()?;
        Ok(record::encode(&session)?)
    }

    /// Snapshot of the finished session.
    pub fn completed(&self) -> Result<CompletedSession, SequenceError> {
        if !self.is_complete() {
            return Err(self.sequence_error(Operation::Serialize));
        }
        Ok(CompletedSession {
            procedure: self.procedure,
            responses: self.history.clone(),
            bracket: self.bracket,
        })
    }

    /// Where the staircase converged. `None` until complete.
    #[must_use]
    pub fn estimate(&self) -> Option<IndifferenceEstimate> {
        self.is_complete()
            .then(|| IndifferenceEstimate::new(self.procedure.kind(), self.bracket))
    }

    fn record_choice(&mut self, choice: Choice) -> Result<Response, SequenceError> {
        let Phase::Awaiting(step) = &self.phase else {
            return Err(self.sequence_error(Operation::SaveChoice));
        };

        let response = Response {
            step_index: step.index(),
            choice,
        };
        self.history.push(response);
        self.bracket = self.bracket.narrow(choice);
        self.phase = Phase::Recorded;

        tracing::debug!(
            step = %response.step_index,
            choice = %choice,
            lower = %self.bracket.lower(),
            upper = %self.bracket.upper(),
            "choice recorded"
        );
        Ok(response)
    }

    fn present_next_step(&mut self) -> Step {
        let step = self.generator.next_step(&self.history);
        debug_assert_eq!(*step.pair(), self.generator.pair(self.bracket));
        tracing::debug!(
            step = %step.index(),
            probe = %self.bracket.probe(),
            "presenting step"
        );
        self.phase = Phase::Awaiting(step);
        step
    }

    fn last_answered(&self) -> StepIndex {
        self.history
            .last()
            .map_or(StepIndex::FIRST, |response| response.step_index)
    }

    fn sequence_error(&self, operation: Operation) -> SequenceError {
        let err = SequenceError {
            operation,
            state: self.state(),
        };
        tracing::warn!("{err}");
        err
    }
}

/// A finished session: procedure, full response history, and final bracket.
///
/// Only produced by a completed engine or by decoding a record, which replays
/// the responses, so the fields are always mutually consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedSession {
    procedure: Procedure,
    responses: Vec<Response>,
    bracket: Bracket,
}

impl CompletedSession {
    #[must_use]
    pub const fn procedure(&self) -> Procedure {
        self.procedure
    }

    #[must_use]
    pub const fn kind(&self) -> ProcedureKind {
        self.procedure.kind()
    }

    #[must_use]
    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    #[must_use]
    pub fn choices(&self) -> Vec<Choice> {
        self.responses.iter().map(|response| response.choice).collect()
    }

    #[must_use]
    pub const fn bracket(&self) -> Bracket {
        self.bracket
    }

    #[must_use]
    pub fn estimate(&self) -> IndifferenceEstimate {
        IndifferenceEstimate::new(self.kind(), self.bracket)
    }

    /// The stimulus pairs the subject saw, regenerated from the responses.
    #[must_use]
    pub fn steps(&self) -> Vec<Step> {
        StimulusGenerator::new(self.kind()).steps_for(&self.choices())
    }
}
