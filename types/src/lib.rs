//! Core domain types for DEEP elicitation.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer: the engine, the record codec, and hosts.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod ids;
mod money;
mod procedure_id;
mod stimulus;

pub use ids::StepIndex;
pub use money::{Cents, Percent, PercentError};
pub use procedure_id::ProcedureId;
pub use stimulus::{Delay, Response, Step, Stimulus, StimulusPair};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Configuration Errors
// ============================================================================

/// Invalid procedure configuration. Fatal: the host must not start the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("unknown procedure type {0:?}, expected TIME or RISK")]
    UnknownProcedure(String),
    #[error("step count {value} is outside 1..={max}")]
    StepCountOutOfRange { value: u32, max: u8 },
    #[error("DEEP was not initialized correctly, check the DEEP ID {0:?}")]
    MalformedIdentifier(String),
}

// ============================================================================
// Procedure Types
// ============================================================================

/// Which latent preference a session measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProcedureKind {
    /// Time discounting: sooner-smaller vs. later-larger rewards.
    Time,
    /// Risk attitude: certain amounts vs. gambles.
    Risk,
}

impl ProcedureKind {
    pub const ALL: [ProcedureKind; 2] = [ProcedureKind::Time, ProcedureKind::Risk];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ProcedureKind::Time => "TIME",
            ProcedureKind::Risk => "RISK",
        }
    }

    /// Parse a procedure kind, ignoring ASCII case.
    pub fn parse(raw: &str) -> Result<Self, ConfigurationError> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("time") {
            Ok(ProcedureKind::Time)
        } else if trimmed.eq_ignore_ascii_case("risk") {
            Ok(ProcedureKind::Risk)
        } else {
            Err(ConfigurationError::UnknownProcedure(raw.to_string()))
        }
    }
}

impl FromStr for ProcedureKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of steps in a session, always within `1..=StepCount::MAX`.
///
/// The upper bound comes from the two-digit identifier format (`DEEPTIME99`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct StepCount(u8);

impl StepCount {
    pub const MAX: u8 = 99;

    pub fn try_new(value: u32) -> Result<Self, ConfigurationError> {
        match u8::try_from(value) {
            Ok(count) if (1..=Self::MAX).contains(&count) => Ok(Self(count)),
            _ => Err(ConfigurationError::StepCountOutOfRange {
                value,
                max: Self::MAX,
            }),
        }
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0 as u32
    }

    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u32> for StepCount {
    type Error = ConfigurationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<StepCount> for u32 {
    fn from(value: StepCount) -> Self {
        value.get()
    }
}

impl fmt::Display for StepCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated elicitation procedure. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Procedure {
    kind: ProcedureKind,
    step_count: StepCount,
}

impl Procedure {
    #[must_use]
    pub const fn new(kind: ProcedureKind, step_count: StepCount) -> Self {
        Self { kind, step_count }
    }

    /// Validate raw configuration values into a procedure.
    pub fn try_new(kind: &str, step_count: u32) -> Result<Self, ConfigurationError> {
        Ok(Self::new(
            ProcedureKind::parse(kind)?,
            StepCount::try_new(step_count)?,
        ))
    }

    #[must_use]
    pub const fn kind(&self) -> ProcedureKind {
        self.kind
    }

    #[must_use]
    pub const fn step_count(&self) -> StepCount {
        self.step_count
    }

    #[must_use]
    pub const fn is_time_variant(&self) -> bool {
        matches!(self.kind, ProcedureKind::Time)
    }

    #[must_use]
    pub const fn is_risk_variant(&self) -> bool {
        matches!(self.kind, ProcedureKind::Risk)
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DEEP{}{}", self.kind, self.step_count)
    }
}

// ============================================================================
// Choice
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("choice must be 0 or 1, got {0}")]
pub struct InvalidChoiceError(pub u8);

/// The subject's pick between the two options of a step.
///
/// Option A is always the sooner (TIME) or certain (RISK) option;
/// option B is the later or risky one. Serializes as `0` / `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Choice {
    OptionA,
    OptionB,
}

impl Choice {
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Choice::OptionA => 0,
            Choice::OptionB => 1,
        }
    }
}

impl TryFrom<u8> for Choice {
    type Error = InvalidChoiceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Choice::OptionA),
            1 => Ok(Choice::OptionB),
            other => Err(InvalidChoiceError(other)),
        }
    }
}

impl From<Choice> for u8 {
    fn from(value: Choice) -> Self {
        value.index()
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}
