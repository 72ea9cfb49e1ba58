//! One survey page, which may host at most one elicitation session.

use deep_config::SessionOptions;
use deep_types::{ConfigurationError, Procedure, ProcedureId};
use thiserror::Error;

use crate::host::HostSession;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("a {0} session is already loaded on this page")]
    AlreadyLoaded(Procedure),
    #[error("the {0} session has unanswered questions")]
    Incomplete(Procedure),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Owner of the page's single session slot.
///
/// The identifier is parsed here, once. A second [`SurveyPage::load`] is
/// rejected until [`SurveyPage::finish`] releases the slot, even when the
/// first session has since been dropped.
#[derive(Debug, Default)]
pub struct SurveyPage {
    loaded: Option<Procedure>,
}

impl SurveyPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the DEEP identifier in `question_text` and start a session for it.
    pub fn load(
        &mut self,
        question_text: &str,
        options: SessionOptions,
    ) -> Result<HostSession, PageError> {
        if let Some(existing) = self.loaded {
            tracing::warn!(procedure = %existing, "ignoring second load on the same page");
            return Err(PageError::AlreadyLoaded(existing));
        }

        let id = ProcedureId::parse(question_text)?;
        let procedure = id.procedure();
        self.loaded = Some(procedure);
        tracing::info!(identifier = %id, procedure = %procedure, "session loaded");
        Ok(HostSession::new(procedure, options))
    }

    /// Release the slot once `session` has answered every question.
    pub fn finish(&mut self, session: &HostSession) -> Result<(), PageError> {
        let procedure = session.procedure();
        if !session.engine().is_complete() {
            return Err(PageError::Incomplete(procedure));
        }
        if self.loaded.take().is_some() {
            tracing::info!(procedure = %procedure, "session finished");
        }
        Ok(())
    }

    #[must_use]
    pub fn loaded(&self) -> Option<Procedure> {
        self.loaded
    }
}
