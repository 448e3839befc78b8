//! HTTP client for the static (rule-based) and ML classification engines.

use std::time::Duration;

use serde::Serialize;

use cafe_config::EngineConfig;
use cafe_core::entities::ClassificationQuery;
use cafe_core::enums::AnalysisMethod;
use cafe_core::responses::ClassificationResponse;

use crate::ClassificationEngine;
use crate::error::EngineError;
use crate::http::{check_response, error_message};

/// Request body: the query wrapped under `characteristics`.
#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    characteristics: &'a ClassificationQuery,
}

pub struct EngineClient {
    http: reqwest::Client,
    base_url: String,
}

impl EngineClient {
    /// # Errors
    ///
    /// Returns [`EngineError::Http`] if the underlying `reqwest::Client` fails to build.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, EngineError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("cafe/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the base URL or timeout is invalid.
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Self::new(config.base_url_trimmed(), config.timeout())
    }

    #[must_use]
    pub fn endpoint_url(&self, method: AnalysisMethod) -> String {
        format!("{}/{}", self.base_url, method.endpoint())
    }

    /// Ask the rule-based engine which coffee type matches.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] on transport failure, a non-success status, an
    /// error payload or an unparsable body.
    pub async fn analyze_static(
        &self,
        query: &ClassificationQuery,
    ) -> Result<ClassificationResponse, EngineError> {
        self.post(AnalysisMethod::Static, query).await
    }

    /// Ask the ML engine for per-type probabilities.
    ///
    /// # Errors
    ///
    /// Same as [`Self::analyze_static`].
    pub async fn analyze_ml(
        &self,
        query: &ClassificationQuery,
    ) -> Result<ClassificationResponse, EngineError> {
        self.post(AnalysisMethod::Ml, query).await
    }

    async fn post(
        &self,
        method: AnalysisMethod,
        query: &ClassificationQuery,
    ) -> Result<ClassificationResponse, EngineError> {
        let url = self.endpoint_url(method);
        tracing::debug!(%method, %url, fields = query.len(), "sending classification request");

        let resp = self
            .http
            .post(&url)
            .json(&AnalyzeRequest {
                characteristics: query,
            })
            .send()
            .await?;
        let body = check_response(resp).await?.text().await?;

        if let Some(message) = error_message(&body) {
            tracing::warn!(%method, %message, "engine returned an error payload");
            return Err(EngineError::Remote(message));
        }
        let response: ClassificationResponse = serde_json::from_str(&body)
            .map_err(|e| EngineError::Parse(format!("{method} engine response: {e}")))?;
        tracing::debug!(%method, coffee_type = ?response.coffee_type, "classification finished");
        Ok(response)
    }
}

impl ClassificationEngine for EngineClient {
    async fn analyze(
        &self,
        method: AnalysisMethod,
        query: &ClassificationQuery,
    ) -> Result<ClassificationResponse, EngineError> {
        self.post(method, query).await
    }
}
