//! Stimulus descriptions, steps, and responses.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Cents, Choice, Percent, StepIndex};

/// When a dated reward is paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delay {
    Today,
    Weeks(u16),
    Months(u16),
}

impl Delay {
    /// Delay length in days, counting a month as 30 days.
    #[must_use]
    pub const fn days(self) -> u32 {
        match self {
            Delay::Today => 0,
            Delay::Weeks(weeks) => weeks as u32 * 7,
            Delay::Months(months) => months as u32 * 30,
        }
    }
}

impl fmt::Display for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Delay::Today => f.write_str("today"),
            Delay::Weeks(1) => f.write_str("in 1 week"),
            Delay::Weeks(n) => write!(f, "in {n} weeks"),
            Delay::Months(1) => f.write_str("in 1 month"),
            Delay::Months(n) => write!(f, "in {n} months"),
        }
    }
}

/// One option presented to the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stimulus {
    /// A certain amount paid after a delay ("Receive $100 in 3 months").
    Dated { amount: Cents, delay: Delay },
    /// A certain amount paid now ("Receive $50 for sure").
    Sure { amount: Cents },
    /// Two outcomes; `chance` is the probability of `win`, the rest goes to `otherwise`.
    Gamble {
        chance: Percent,
        win: Cents,
        otherwise: Cents,
    },
}

impl Stimulus {
    /// Undiscounted expected payout in cents, rounded toward zero.
    #[must_use]
    pub fn expected_value(&self) -> Cents {
        match *self {
            Stimulus::Dated { amount, .. } | Stimulus::Sure { amount } => amount,
            Stimulus::Gamble {
                chance,
                win,
                otherwise,
            } => {
                let p = i64::from(chance.value());
                let weighted =
                    p * i64::from(win.value()) + (100 - p) * i64::from(otherwise.value());
                Cents::new((weighted / 100) as i32)
            }
        }
    }
}

fn write_outcome(f: &mut fmt::Formatter<'_>, chance: Percent, amount: Cents) -> fmt::Result {
    if amount.is_negative() {
        write!(f, "{chance} chance to lose {}", amount.abs())
    } else {
        write!(f, "{chance} chance to win {amount}")
    }
}

impl fmt::Display for Stimulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Stimulus::Dated { amount, delay } => write!(f, "Receive {amount} {delay}"),
            Stimulus::Sure { amount } => write!(f, "Receive {amount} for sure"),
            Stimulus::Gamble {
                chance,
                win,
                otherwise,
            } => {
                write_outcome(f, chance, win)?;
                f.write_str(", ")?;
                write_outcome(f, chance.complement(), otherwise)
            }
        }
    }
}

/// The two options shown at one step, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StimulusPair {
    pub option_a: Stimulus,
    pub option_b: Stimulus,
}

impl StimulusPair {
    #[must_use]
    pub const fn new(option_a: Stimulus, option_b: Stimulus) -> Self {
        Self { option_a, option_b }
    }

    #[must_use]
    pub const fn get(&self, choice: Choice) -> &Stimulus {
        match choice {
            Choice::OptionA => &self.option_a,
            Choice::OptionB => &self.option_b,
        }
    }

    #[must_use]
    pub const fn as_array(&self) -> [Stimulus; 2] {
        [self.option_a, self.option_b]
    }
}

/// A produced question. Never mutated once handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Step {
    index: StepIndex,
    pair: StimulusPair,
}

impl Step {
    #[must_use]
    pub const fn new(index: StepIndex, pair: StimulusPair) -> Self {
        Self { index, pair }
    }

    #[must_use]
    pub const fn index(&self) -> StepIndex {
        self.index
    }

    #[must_use]
    pub const fn pair(&self) -> &StimulusPair {
        &self.pair
    }
}

/// The recorded answer to one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub step_index: StepIndex,
    pub choice: Choice,
}
