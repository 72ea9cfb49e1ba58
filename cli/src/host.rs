//! Interactive host session: presents steps, collects answers, yields the record.

use std::io::{self, BufRead, Write};

use deep_config::SessionOptions;
use deep_core::{ElicitationEngine, EngineError, Question, SequenceError, UserInputError};
use deep_types::{Procedure, Step, Stimulus};
use thiserror::Error;

use crate::console::Console;
use crate::tutorial;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("input ended before the session was complete")]
    InputClosed,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<SequenceError> for HostError {
    fn from(err: SequenceError) -> Self {
        HostError::Engine(err.into())
    }
}

/// On-screen order of the two options.
///
/// The engine always sees canonical indices; only the display is swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Canonical,
    Swapped,
}

impl Placement {
    /// TIME sessions get a random placement when shuffling is enabled. RISK is fixed.
    #[must_use]
    pub fn choose(procedure: Procedure, options: SessionOptions) -> Self {
        if procedure.is_time_variant() && options.shuffle_time_options && rand::random::<bool>() {
            Placement::Swapped
        } else {
            Placement::Canonical
        }
    }

    /// Options in the order they are shown.
    #[must_use]
    pub fn on_screen(self, step: &Step) -> [Stimulus; 2] {
        let [a, b] = step.pair().as_array();
        match self {
            Placement::Canonical => [a, b],
            Placement::Swapped => [b, a],
        }
    }

    /// Translate a 0-based screen position to the engine's choice index.
    ///
    /// Positions outside the two options pass through unchanged so the engine
    /// can reject them.
    #[must_use]
    pub const fn to_choice(self, position: u8) -> u8 {
        match (self, position) {
            (Placement::Swapped, 0) => 1,
            (Placement::Swapped, 1) => 0,
            (_, other) => other,
        }
    }
}

/// Map a typed reply to a 0-based screen position.
///
/// Blank, zero or non-numeric replies count as no selection.
fn parse_selection(raw: &str) -> Option<u8> {
    let n: u32 = raw.trim().parse().ok()?;
    let position = n.checked_sub(1)?;
    Some(u8::try_from(position).unwrap_or(u8::MAX))
}

/// One subject working through one procedure.
#[derive(Debug)]
pub struct HostSession {
    engine: ElicitationEngine,
    options: SessionOptions,
    placement: Placement,
}

impl HostSession {
    #[must_use]
    pub fn new(procedure: Procedure, options: SessionOptions) -> Self {
        Self::with_placement(procedure, options, Placement::choose(procedure, options))
    }

    #[must_use]
    pub fn with_placement(
        procedure: Procedure,
        options: SessionOptions,
        placement: Placement,
    ) -> Self {
        Self {
            engine: ElicitationEngine::new(procedure),
            options,
            placement,
        }
    }

    #[must_use]
    pub const fn procedure(&self) -> Procedure {
        self.engine.procedure()
    }

    #[must_use]
    pub const fn options(&self) -> SessionOptions {
        self.options
    }

    #[must_use]
    pub const fn placement(&self) -> Placement {
        self.placement
    }

    #[must_use]
    pub fn engine(&self) -> &ElicitationEngine {
        &self.engine
    }

    /// Warm-up quiz (unless skipped), then the full elicitation.
    ///
    /// Returns the serialized record.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> Result<String, HostError> {
        if self.options.skip_tutorial {
            tracing::debug!("warm-up quiz skipped");
        } else {
            tutorial::run(self.procedure().kind(), console)?;
        }

        let total = self.procedure().step_count().get();
        let mut step = self.engine.begin()?;
        loop {
            self.present(&step, total, console)?;
            self.collect_answer(console)?;

            if self.options.debug {
                let bracket = self.engine.bracket();
                console.say(format!(
                    "[debug] bracket {} .. {}",
                    bracket.lower(),
                    bracket.upper()
                ))?;
            }

            match self.engine.next_question()? {
                Question::Next(next) => step = next,
                Question::Complete => break,
            }
        }

        let record = self.engine.serialize()?;
        console.blank()?;
        console.say("Thank you. All questions have been answered.")?;
        Ok(record)
    }

    fn present<R: BufRead, W: Write>(
        &self,
        step: &Step,
        total: u32,
        console: &mut Console<R, W>,
    ) -> Result<(), HostError> {
        console.blank()?;
        console.say(format!("Question {} of {total}", step.index().ordinal()))?;
        console.say("Which of the following options do you prefer?")?;
        for (n, stimulus) in self.placement.on_screen(step).iter().enumerate() {
            console.say(format!("  {}) {stimulus}", n + 1))?;
        }
        Ok(())
    }

    /// Ask until the engine accepts a choice for the current step.
    fn collect_answer<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> Result<(), HostError> {
        loop {
            let reply = console
                .ask("Your choice (1 or 2):")?
                .ok_or(HostError::InputClosed)?;
            let selection = parse_selection(&reply).map(|pos| self.placement.to_choice(pos));

            match self.engine.save_choice(selection) {
                Ok(_) => return Ok(()),
                Err(err) if err.is_recoverable() => {
                    console.say(UserInputError::NoSelection.to_string())?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
