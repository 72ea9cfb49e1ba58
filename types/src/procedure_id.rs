//! The host-facing procedure identifier (`DEEPTIME12`, `deeprisk5`, ...).
//!
//! Survey platforms hand over free text (a Qualtrics question text, a LimeSurvey
//! question code). The identifier is searched anywhere inside it, ignoring case,
//! and parsed exactly once into a typed [`Procedure`].

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::{ConfigurationError, Procedure, ProcedureKind, StepCount};

static IDENTIFIER_PATTERN: OnceLock<Regex> = OnceLock::new();

fn identifier_pattern() -> &'static Regex {
    IDENTIFIER_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)DEEP(TIME|RISK)([0-9]{1,2})").expect("valid DEEP identifier regex")
    })
}

/// A parsed identifier together with the text it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureId {
    source: String,
    procedure: Procedure,
}

impl ProcedureId {
    /// Search `text` for a DEEP identifier and validate it.
    ///
    /// `DEEPTIME0` matches the pattern but fails step-count validation.
    pub fn parse(text: &str) -> Result<Self, ConfigurationError> {
        let captures = identifier_pattern()
            .captures(text)
            .ok_or_else(|| ConfigurationError::MalformedIdentifier(text.to_string()))?;

        let kind = ProcedureKind::parse(&captures[1])?;
        let count: u32 = captures[2]
            .parse()
            .map_err(|_| ConfigurationError::MalformedIdentifier(text.to_string()))?;
        let step_count = StepCount::try_new(count)?;

        Ok(Self {
            source: text.to_string(),
            procedure: Procedure::new(kind, step_count),
        })
    }

    #[must_use]
    pub fn procedure(&self) -> Procedure {
        self.procedure
    }

    /// The original host text the identifier was found in.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for ProcedureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.procedure, f)
    }
}
