//! Summary of where a completed staircase converged.
//!
//! Derived values are for display and downstream analysis only; the engine
//! never feeds them back into stimulus selection.

use std::fmt;

use serde::Serialize;

use deep_types::{Cents, ProcedureKind, Stimulus};

use crate::staircase::{Bracket, StimulusGenerator};

const DAYS_PER_YEAR: f64 = 365.0;

/// Risk attitude implied by a certainty equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskAttitude {
    /// Certainty equivalent strictly below the gamble's expected value.
    Averse,
    /// Expected value still inside the final bracket.
    Neutral,
    /// Certainty equivalent strictly above the gamble's expected value.
    Seeking,
}

impl fmt::Display for RiskAttitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskAttitude::Averse => "risk averse",
            RiskAttitude::Neutral => "risk neutral",
            RiskAttitude::Seeking => "risk seeking",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndifferenceEstimate {
    kind: ProcedureKind,
    bracket: Bracket,
    anchor: Stimulus,
}

impl IndifferenceEstimate {
    #[must_use]
    pub fn new(kind: ProcedureKind, bracket: Bracket) -> Self {
        Self {
            kind,
            bracket,
            anchor: StimulusGenerator::new(kind).anchor(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ProcedureKind {
        self.kind
    }

    #[must_use]
    pub const fn bracket(&self) -> Bracket {
        self.bracket
    }

    /// The fixed option the probe amounts were compared against.
    #[must_use]
    pub const fn anchor(&self) -> Stimulus {
        self.anchor
    }

    /// Point estimate of the indifference amount.
    #[must_use]
    pub const fn midpoint(&self) -> Cents {
        self.bracket.probe()
    }

    /// Annualized discount rate at which the midpoint today equals the later reward.
    ///
    /// `None` for RISK sessions and when the midpoint is not positive.
    #[must_use]
    pub fn implied_annual_rate(&self) -> Option<f64> {
        let Stimulus::Dated { amount, delay } = self.anchor else {
            return None;
        };
        let midpoint = self.midpoint();
        if midpoint.value() <= 0 || delay.days() == 0 {
            return None;
        }
        let ratio = f64::from(amount.value()) / f64::from(midpoint.value());
        Some(ratio.powf(DAYS_PER_YEAR / f64::from(delay.days())) - 1.0)
    }

    /// Expected value of the gamble minus the certainty equivalent.
    #[must_use]
    pub fn risk_premium(&self) -> Option<Cents> {
        match self.anchor {
            Stimulus::Gamble { .. } => Some(Cents::new(
                self.anchor.expected_value().value() - self.midpoint().value(),
            )),
            Stimulus::Dated { .. } | Stimulus::Sure { .. } => None,
        }
    }

    #[must_use]
    pub fn risk_attitude(&self) -> Option<RiskAttitude> {
        if !matches!(self.anchor, Stimulus::Gamble { .. }) {
            return None;
        }
        let expected = self.anchor.expected_value();
        Some(if self.bracket.contains(expected) {
            RiskAttitude::Neutral
        } else if self.bracket.upper() < expected {
            RiskAttitude::Averse
        } else {
            RiskAttitude::Seeking
        })
    }
}

impl fmt::Display for IndifferenceEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "indifferent near {} (between {} and {}) against \"{}\"",
            self.midpoint(),
            self.bracket.lower(),
            self.bracket.upper(),
            self.anchor
        )
    }
}
