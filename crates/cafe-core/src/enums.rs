//! Characteristic kinds, roles, analysis methods and the specialist flow state machine.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `FlowState` provides `allowed_next_states()` to enforce valid transitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// CharacteristicKind
// ---------------------------------------------------------------------------

/// Whether a characteristic is a continuous range or an enumerated set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CharacteristicKind {
    Numeric,
    Categorical,
}

impl CharacteristicKind {
    /// Return the string representation used in SQL storage and form keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
        }
    }
}

impl fmt::Display for CharacteristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Coarse role flag. Experts edit the knowledge base, specialists query it.
///
/// This is not an access-control system; it only decides which commands are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Expert,
    Specialist,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expert => "expert",
            Self::Specialist => "specialist",
        }
    }

    #[must_use]
    pub const fn can_edit(self) -> bool {
        matches!(self, Self::Expert)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AnalysisMethod
// ---------------------------------------------------------------------------

/// Which external classification engine to consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMethod {
    /// Rule-based solver matching values against every type's narrowing.
    Static,
    /// Statistical model returning per-type probabilities.
    Ml,
}

impl AnalysisMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Ml => "ml",
        }
    }

    /// Path segment of the engine endpoint, relative to the engine base URL.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Static => "specialist/analyze-static",
            Self::Ml => "specialist/analyze-ml",
        }
    }

    /// The result state a successful analysis lands in.
    #[must_use]
    pub const fn result_state(self) -> FlowState {
        match self {
            Self::Static => FlowState::StaticResult,
            Self::Ml => FlowState::MlResult,
        }
    }
}

impl fmt::Display for AnalysisMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FlowState
// ---------------------------------------------------------------------------

/// State of the specialist analysis flow.
///
/// ```text
/// idle → blocked → idle (knowledge base fixed by an expert)
///      → form_filled → validated → submitted → static_result
///                                            → ml_result
///                                            → error
/// any of form_filled, validated, static_result, ml_result, error → form_filled (edit)
///                                                                → blocked (knowledge base broke)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    #[default]
    Idle,
    Blocked,
    FormFilled,
    Validated,
    Submitted,
    StaticResult,
    MlResult,
    Error,
}

impl FlowState {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Idle => &[Self::Blocked, Self::FormFilled],
            Self::Blocked => &[Self::Idle],
            Self::FormFilled => &[Self::FormFilled, Self::Validated, Self::Blocked],
            Self::Validated => &[Self::FormFilled, Self::Submitted, Self::Blocked],
            Self::Submitted => &[Self::StaticResult, Self::MlResult, Self::Error],
            Self::StaticResult | Self::MlResult | Self::Error => &[Self::FormFilled, Self::Blocked],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Blocked => "blocked",
            Self::FormFilled => "form_filled",
            Self::Validated => "validated",
            Self::Submitted => "submitted",
            Self::StaticResult => "static_result",
            Self::MlResult => "ml_result",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
