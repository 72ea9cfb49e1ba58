//! Staircase stimulus generation.
//!
//! Each procedure kind titrates one amount against a fixed alternative:
//!
//! | Kind | Option A (varied)      | Option B (fixed)                              |
//! |------|------------------------|-----------------------------------------------|
//! | TIME | `Receive $X today`     | `Receive $100 in 3 months`                    |
//! | RISK | `Receive $X for sure`  | `50% chance to win $100, 50% chance to win $0`|
//!
//! The bracket `[lower, upper]` (in cents) starts at `[0, 10000]`. The probe `X` is
//! the midpoint rounded toward `lower`. Picking option A means the subject values
//! the fixed alternative at most `X`, so `upper` drops to `X`; picking option B
//! raises `lower` to `X`. Everything here is a pure function of the kind and the
//! prior choices, so replaying a response sequence reproduces every stimulus.

use serde::Serialize;

use deep_types::{
    Cents, Choice, Delay, Percent, ProcedureKind, Response, Step, StepIndex, Stimulus,
    StimulusPair,
};

const INITIAL_LOWER: Cents = Cents::ZERO;
const INITIAL_UPPER: Cents = Cents::from_dollars(100);

const TIME_LATER_AMOUNT: Cents = Cents::from_dollars(100);
const TIME_LATER_DELAY: Delay = Delay::Months(3);

const RISK_WIN: Cents = Cents::from_dollars(100);
const RISK_OTHERWISE: Cents = Cents::ZERO;

/// Interval of amounts still consistent with the subject's answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bracket {
    lower: Cents,
    upper: Cents,
}

impl Bracket {
    /// Returns `None` when `lower > upper`.
    #[must_use]
    pub fn new(lower: Cents, upper: Cents) -> Option<Self> {
        (lower <= upper).then_some(Self { lower, upper })
    }

    #[must_use]
    pub const fn lower(self) -> Cents {
        self.lower
    }

    #[must_use]
    pub const fn upper(self) -> Cents {
        self.upper
    }

    #[must_use]
    pub const fn width(self) -> i32 {
        self.upper.value() - self.lower.value()
    }

    /// Midpoint, rounded toward `lower`.
    #[must_use]
    pub const fn probe(self) -> Cents {
        Cents::new(self.lower.value() + self.width() / 2)
    }

    #[must_use]
    pub const fn contains(self, amount: Cents) -> bool {
        self.lower.value() <= amount.value() && amount.value() <= self.upper.value()
    }

    /// Shrink toward the probe. Never widens.
    #[must_use]
    pub const fn narrow(self, choice: Choice) -> Self {
        let probe = self.probe();
        match choice {
            Choice::OptionA => Self {
                lower: self.lower,
                upper: probe,
            },
            Choice::OptionB => Self {
                lower: probe,
                upper: self.upper,
            },
        }
    }
}

/// Derives stimulus pairs for one procedure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StimulusGenerator {
    kind: ProcedureKind,
}

impl StimulusGenerator {
    #[must_use]
    pub const fn new(kind: ProcedureKind) -> Self {
        Self { kind }
    }

    #[must_use]
    pub const fn kind(&self) -> ProcedureKind {
        self.kind
    }

    #[must_use]
    pub const fn initial_bracket(&self) -> Bracket {
        Bracket {
            lower: INITIAL_LOWER,
            upper: INITIAL_UPPER,
        }
    }

    /// The fixed later/risky alternative, always option B.
    #[must_use]
    pub const fn anchor(&self) -> Stimulus {
        match self.kind {
            ProcedureKind::Time => Stimulus::Dated {
                amount: TIME_LATER_AMOUNT,
                delay: TIME_LATER_DELAY,
            },
            ProcedureKind::Risk => Stimulus::Gamble {
                chance: Percent::HALF,
                win: RISK_WIN,
                otherwise: RISK_OTHERWISE,
            },
        }
    }

    /// The sooner/certain option offering `amount`, always option A.
    #[must_use]
    pub const fn probe_stimulus(&self, amount: Cents) -> Stimulus {
        match self.kind {
            ProcedureKind::Time => Stimulus::Dated {
                amount,
                delay: Delay::Today,
            },
            ProcedureKind::Risk => Stimulus::Sure { amount },
        }
    }

    #[must_use]
    pub const fn pair(&self, bracket: Bracket) -> StimulusPair {
        StimulusPair::new(self.probe_stimulus(bracket.probe()), self.anchor())
    }

    /// Bracket after applying `choices` in order to the initial bracket.
    #[must_use]
    pub fn bracket_after<I>(&self, choices: I) -> Bracket
    where
        I: IntoIterator<Item = Choice>,
    {
        choices
            .into_iter()
            .fold(self.initial_bracket(), Bracket::narrow)
    }

    /// The step that follows `history`.
    #[must_use]
    pub fn next_step(&self, history: &[Response]) -> Step {
        let bracket = self.bracket_after(history.iter().map(|response| response.choice));
        Step::new(StepIndex::new(history.len() as u32), self.pair(bracket))
    }

    /// Every step a subject answering `choices` is shown, in order.
    #[must_use]
    pub fn steps_for(&self, choices: &[Choice]) -> Vec<Step> {
        let mut bracket = self.initial_bracket();
        let mut steps = Vec::with_capacity(choices.len());
        for (index, &choice) in choices.iter().enumerate() {
            steps.push(Step::new(StepIndex::new(index as u32), self.pair(bracket)));
            bracket = bracket.narrow(choice);
        }
        steps
    }
}
