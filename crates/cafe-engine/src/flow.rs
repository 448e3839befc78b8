//! The specialist analysis flow.
//!
//! Every state change goes through [`FlowState::can_transition_to`], so the flow
//! cannot skip validation or submit twice. A submission that is abandoned while
//! in flight (its future dropped) leaves the flow in `submitted` until
//! [`AnalysisFlow::abandon`] is called.

use thiserror::Error;

use cafe_core::completeness::CompletenessReport;
use cafe_core::entities::ClassificationQuery;
use cafe_core::enums::{AnalysisMethod, FlowState};
use cafe_core::errors::CoreError;
use cafe_core::request::{ClassificationRequestBuilder, FormInput, FormValues};
use cafe_core::responses::ClassificationResponse;
use cafe_core::snapshot::KnowledgeSnapshot;

use crate::ClassificationEngine;
use crate::error::EngineError;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Classification is not allowed until an expert completes the knowledge base.
    #[error(
        "Knowledge base is not ready: {} coffee type(s) without characteristics, {} with incomplete values",
        .0.no_characteristics.len(),
        .0.incomplete_values.len()
    )]
    Blocked(CompletenessReport),

    /// A submission is already waiting for an engine response.
    #[error("An analysis is already in flight")]
    InFlight,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Remote(#[from] EngineError),
}

#[derive(Debug, Default)]
pub struct AnalysisFlow {
    state: FlowState,
    form: FormValues,
    query: Option<ClassificationQuery>,
    response: Option<ClassificationResponse>,
    last_error: Option<String>,
}

impl AnalysisFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> FlowState {
        self.state
    }

    #[must_use]
    pub const fn form(&self) -> &FormValues {
        &self.form
    }

    #[must_use]
    pub const fn query(&self) -> Option<&ClassificationQuery> {
        self.query.as_ref()
    }

    /// The last engine response, kept until the next edit.
    #[must_use]
    pub const fn response(&self) -> Option<&ClassificationResponse> {
        self.response.as_ref()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Gate the flow on knowledge-base completeness. A not-ready report moves any
    /// settled state to `blocked`, discarding the form's query and result; a ready
    /// report moves `blocked` back to `idle`.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::Blocked`] when the report is not ready,
    /// [`AnalysisError::InFlight`] while a submission is pending.
    pub fn check_readiness(&mut self, report: &CompletenessReport) -> Result<(), AnalysisError> {
        if self.state == FlowState::Submitted {
            return Err(AnalysisError::InFlight);
        }
        match (self.state, report.is_ready()) {
            (FlowState::Blocked, true) => {
                self.transition(FlowState::Idle)?;
                Ok(())
            }
            (FlowState::Blocked, false) => Err(AnalysisError::Blocked(report.clone())),
            (_, false) => {
                self.transition(FlowState::Blocked)?;
                self.query = None;
                self.response = None;
                Err(AnalysisError::Blocked(report.clone()))
            }
            (_, true) => Ok(()),
        }
    }

    /// Set or replace one field. Any earlier query or result is discarded.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InFlight`] while submitted, `CoreError::InvalidTransition`
    /// while blocked.
    pub fn edit(&mut self, id: i64, input: FormInput) -> Result<(), AnalysisError> {
        self.enter_form_filled()?;
        self.form.set(id, input);
        Ok(())
    }

    /// Replace the whole form.
    ///
    /// # Errors
    ///
    /// Same as [`Self::edit`].
    pub fn fill(&mut self, form: FormValues) -> Result<(), AnalysisError> {
        self.enter_form_filled()?;
        self.form = form;
        Ok(())
    }

    /// Build the query from the current form against the snapshot's registry.
    /// On failure the flow stays in `form_filled`.
    ///
    /// # Errors
    ///
    /// `CoreError::Validation` / `CoreError::EmptyQuery` from the request builder,
    /// `CoreError::InvalidTransition` if the form has not been filled.
    pub fn validate(
        &mut self,
        snapshot: &KnowledgeSnapshot,
    ) -> Result<&ClassificationQuery, AnalysisError> {
        self.ensure_can(FlowState::Validated)?;
        let query = ClassificationRequestBuilder::from_snapshot(snapshot).build(&self.form)?;
        self.transition(FlowState::Validated)?;
        Ok(&*self.query.insert(query))
    }

    /// Send the validated query to an engine. Lands in `static_result` or
    /// `ml_result` on success and in `error` on an engine failure.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InFlight`] if a submission is pending,
    /// `CoreError::InvalidTransition` if the form is not validated, and
    /// [`AnalysisError::Remote`] if the engine fails.
    pub async fn submit<E: ClassificationEngine>(
        &mut self,
        engine: &E,
        method: AnalysisMethod,
    ) -> Result<&ClassificationResponse, AnalysisError> {
        if self.state == FlowState::Submitted {
            return Err(AnalysisError::InFlight);
        }
        self.ensure_can(FlowState::Submitted)?;
        let query = self
            .query
            .clone()
            .ok_or_else(|| CoreError::InvalidTransition {
                from: self.state.to_string(),
                to: FlowState::Submitted.to_string(),
            })?;
        self.transition(FlowState::Submitted)?;
        tracing::info!(%method, fields = query.len(), "submitting analysis");

        match engine.analyze(method, &query).await {
            Ok(response) => {
                self.transition(method.result_state())?;
                Ok(&*self.response.insert(response))
            }
            Err(error) => {
                self.transition(FlowState::Error)?;
                tracing::warn!(%method, %error, "analysis failed");
                self.last_error = Some(error.to_string());
                Err(AnalysisError::Remote(error))
            }
        }
    }

    /// Give up on a pending submission; its response, if any, is ignored.
    pub fn abandon(&mut self) {
        if self.state == FlowState::Submitted {
            self.state = FlowState::Error;
            self.last_error = Some("analysis abandoned".to_string());
        }
    }

    /// Readiness check, fill, validate and submit in one call.
    ///
    /// # Errors
    ///
    /// Any error of the individual steps.
    pub async fn analyze<E: ClassificationEngine>(
        &mut self,
        engine: &E,
        method: AnalysisMethod,
        snapshot: &KnowledgeSnapshot,
        form: FormValues,
    ) -> Result<&ClassificationResponse, AnalysisError> {
        self.check_readiness(&snapshot.completeness())?;
        self.fill(form)?;
        self.validate(snapshot)?;
        self.submit(engine, method).await
    }

    fn enter_form_filled(&mut self) -> Result<(), AnalysisError> {
        if self.state == FlowState::Submitted {
            return Err(AnalysisError::InFlight);
        }
        self.transition(FlowState::FormFilled)?;
        self.query = None;
        self.response = None;
        self.last_error = None;
        Ok(())
    }

    fn ensure_can(&self, next: FlowState) -> Result<(), CoreError> {
        if self.state.can_transition_to(next) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            })
        }
    }

    fn transition(&mut self, next: FlowState) -> Result<(), CoreError> {
        self.ensure_can(next)?;
        tracing::debug!(from = %self.state, to = %next, "analysis flow transition");
        self.state = next;
        Ok(())
    }
}
