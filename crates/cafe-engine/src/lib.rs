//! # cafe-engine
//!
//! Talks to the two external classification engines and drives the
//! specialist's analysis flow.
//!
//! - [`client::EngineClient`]: `POST specialist/analyze-static` and
//!   `POST specialist/analyze-ml` with the body
//!   `{"characteristics": {"numeric": {...}, "categorical": {...}}}`.
//! - [`flow::AnalysisFlow`]: the `idle → form_filled → validated → submitted →
//!   result` state machine, with the not-ready (`blocked`) and in-flight guards.
//!
//! Engine responses are surfaced verbatim. Failures are reported, never retried.

pub mod client;
mod error;
pub mod flow;
mod http;

use std::future::Future;

use cafe_core::entities::ClassificationQuery;
use cafe_core::enums::AnalysisMethod;
use cafe_core::responses::ClassificationResponse;

pub use client::EngineClient;
pub use error::EngineError;
pub use flow::{AnalysisError, AnalysisFlow};

/// Something that classifies a query. Implemented by [`EngineClient`] and by
/// in-process fakes in tests.
pub trait ClassificationEngine {
    fn analyze(
        &self,
        method: AnalysisMethod,
        query: &ClassificationQuery,
    ) -> impl Future<Output = Result<ClassificationResponse, EngineError>> + Send;
}
