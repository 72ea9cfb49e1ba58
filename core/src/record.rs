//! Canonical result records.
//!
//! A record is compact JSON with a fixed field order, plain ASCII, safe to drop
//! verbatim into a survey platform's free-text answer field:
//!
//! ```json
//! {"format":"DEEP","version":1,"procedure":"TIME","stepCount":3,"responses":[0,1,0],"estimate":{"lowerCents":2500,"upperCents":3750}}
//! ```
//!
//! Decoding validates every field and replays the responses; the stored estimate
//! must match the replayed bracket exactly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use deep_types::{Cents, Choice, ConfigurationError, Procedure, ProcedureKind, StepCount};

use crate::engine::{CompletedSession, ElicitationEngine};
use crate::errors::SequenceError;
use crate::staircase::Bracket;

pub const RECORD_FORMAT: &str = "DEEP";
pub const RECORD_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown record format {0:?}")]
    UnknownFormat(String),
    #[error("unsupported record version {0}")]
    UnsupportedVersion(u32),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("response {step_index} has invalid choice {value}")]
    InvalidChoice { step_index: usize, value: u8 },
    #[error("record declares {expected} steps but holds {actual} responses")]
    ResponseCountMismatch { expected: usize, actual: usize },
    #[error("stored estimate [{stored_lower}, {stored_upper}] does not match replayed [{replayed_lower}, {replayed_upper}]")]
    EstimateMismatch {
        stored_lower: Cents,
        stored_upper: Cents,
        replayed_lower: Cents,
        replayed_upper: Cents,
    },
    #[error("replay failed: {0}")]
    Replay(#[from] SequenceError),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct EstimateWire {
    lower_cents: i32,
    upper_cents: i32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RecordWire {
    format: String,
    version: u32,
    procedure: ProcedureKind,
    step_count: u32,
    responses: Vec<u8>,
    estimate: EstimateWire,
}

/// Encode a completed session.
pub fn encode(session: &CompletedSession) -> Result<String, RecordError> {
    let procedure = session.procedure();
    let bracket = session.bracket();
    let wire = RecordWire {
        format: RECORD_FORMAT.to_string(),
        version: RECORD_VERSION,
        procedure: procedure.kind(),
        step_count: procedure.step_count().get(),
        responses: session
            .responses()
            .iter()
            .map(|response| response.choice.index())
            .collect(),
        estimate: EstimateWire {
            lower_cents: bracket.lower().value(),
            upper_cents: bracket.upper().value(),
        },
    };
    Ok(serde_json::to_string(&wire)?)
}

/// Parse and verify a record produced by [`encode`].
pub fn decode(text: &str) -> Result<CompletedSession, RecordError> {
    let wire: RecordWire = serde_json::from_str(text.trim())?;

    if wire.format != RECORD_FORMAT {
        return Err(RecordError::UnknownFormat(wire.format));
    }
    if wire.version != RECORD_VERSION {
        return Err(RecordError::UnsupportedVersion(wire.version));
    }

    let step_count = StepCount::try_new(wire.step_count)?;
    let procedure = Procedure::new(wire.procedure, step_count);

    if wire.responses.len() != step_count.as_usize() {
        return Err(RecordError::ResponseCountMismatch {
            expected: step_count.as_usize(),
            actual: wire.responses.len(),
        });
    }

    let choices = wire
        .responses
        .iter()
        .enumerate()
        .map(|(step_index, &value)| {
            Choice::try_from(value).map_err(|_| RecordError::InvalidChoice { step_index, value })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let session = ElicitationEngine::replay(procedure, &choices)?.completed()?;

    let replayed = session.bracket();
    let stored = Bracket::new(
        Cents::new(wire.estimate.lower_cents),
        Cents::new(wire.estimate.upper_cents),
    );
    if stored != Some(replayed) {
        return Err(RecordError::EstimateMismatch {
            stored_lower: Cents::new(wire.estimate.lower_cents),
            stored_upper: Cents::new(wire.estimate.upper_cents),
            replayed_lower: replayed.lower(),
            replayed_upper: replayed.upper(),
        });
    }

    tracing::debug!(procedure = %procedure, "record decoded");
    Ok(session)
}
