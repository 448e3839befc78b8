//! Normalization of specialist form input into a [`ClassificationQuery`].
//!
//! Form values are a tagged union per characteristic kind, keyed by characteristic
//! id. The legacy composite keys (`numeric_<id>`, `categorical_<id>`) are accepted
//! through [`FormValues::from_tagged`] and parsed once at the edge.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::{Characteristic, ClassificationQuery, QueryValue};
use crate::enums::CharacteristicKind;
use crate::errors::CoreError;
use crate::ids::CharacteristicId;
use crate::snapshot::KnowledgeSnapshot;
use crate::validate::validate_single_input;

/// One raw form field, tagged with the kind the form rendered it as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FormInput {
    Numeric(String),
    Categorical(String),
}

impl FormInput {
    #[must_use]
    pub const fn kind(&self) -> CharacteristicKind {
        match self {
            Self::Numeric(_) => CharacteristicKind::Numeric,
            Self::Categorical(_) => CharacteristicKind::Categorical,
        }
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Numeric(raw) | Self::Categorical(raw) => raw,
        }
    }

    #[must_use]
    pub fn new(kind: CharacteristicKind, raw: impl Into<String>) -> Self {
        match kind {
            CharacteristicKind::Numeric => Self::Numeric(raw.into()),
            CharacteristicKind::Categorical => Self::Categorical(raw.into()),
        }
    }
}

/// A legacy composite form key such as `numeric_1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormKey {
    pub kind: CharacteristicKind,
    pub id: CharacteristicId,
}

impl FromStr for FormKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::validation(format!("form field '{s}'"), "unrecognized field key");
        let (prefix, id) = s.split_once('_').ok_or_else(invalid)?;
        let kind = match prefix {
            "numeric" => CharacteristicKind::Numeric,
            "categorical" => CharacteristicKind::Categorical,
            _ => return Err(invalid()),
        };
        let id = id.parse::<CharacteristicId>().map_err(|_| invalid())?;
        Ok(Self { kind, id })
    }
}

impl fmt::Display for FormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind, self.id)
    }
}

/// The specialist's form, one entry per characteristic id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValues {
    entries: BTreeMap<CharacteristicId, FormInput>,
}

impl FormValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from legacy `(composite key, raw value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if a key is not `numeric_<id>` or `categorical_<id>`.
    pub fn from_tagged<I, K, V>(pairs: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::new();
        for (key, value) in pairs {
            let key: FormKey = key.as_ref().parse()?;
            form.set(key.id, FormInput::new(key.kind, value));
        }
        Ok(form)
    }

    /// Set (or replace, on edit) the entry for a characteristic.
    pub fn set(&mut self, id: CharacteristicId, input: FormInput) {
        self.entries.insert(id, input);
    }

    pub fn set_numeric(&mut self, id: CharacteristicId, raw: impl Into<String>) {
        self.set(id, FormInput::Numeric(raw.into()));
    }

    pub fn set_categorical(&mut self, id: CharacteristicId, raw: impl Into<String>) {
        self.set(id, FormInput::Categorical(raw.into()));
    }

    pub fn clear(&mut self, id: CharacteristicId) {
        self.entries.remove(&id);
    }

    #[must_use]
    pub fn get(&self, id: CharacteristicId) -> Option<&FormInput> {
        self.entries.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CharacteristicId, &FormInput)> {
        self.entries.iter().map(|(id, input)| (*id, input))
    }

    /// Whether every field is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.entries.values().all(|input| input.raw().trim().is_empty())
    }
}

/// Turns a [`FormValues`] into a [`ClassificationQuery`] against the global registry.
///
/// Guarantees on success: every id in the query exists in the registry, every
/// numeric value lies within its characteristic's global range, and every
/// categorical value is one of its characteristic's global values.
pub struct ClassificationRequestBuilder<'a> {
    characteristics: &'a BTreeMap<CharacteristicId, Characteristic>,
}

impl<'a> ClassificationRequestBuilder<'a> {
    #[must_use]
    pub const fn new(characteristics: &'a BTreeMap<CharacteristicId, Characteristic>) -> Self {
        Self { characteristics }
    }

    #[must_use]
    pub const fn from_snapshot(snapshot: &'a KnowledgeSnapshot) -> Self {
        Self::new(&snapshot.characteristics)
    }

    /// Build the query. Blank fields are omitted.
    ///
    /// # Errors
    ///
    /// - `CoreError::Validation` naming the characteristic if its id is unknown, the
    ///   field kind disagrees with the registry, a number does not parse, or the value
    ///   falls outside the global range / value set.
    /// - `CoreError::EmptyQuery` if no field carries a value.
    pub fn build(&self, form: &FormValues) -> Result<ClassificationQuery, CoreError> {
        let mut query = ClassificationQuery::default();

        for (id, input) in form.iter() {
            let raw = input.raw().trim();
            if raw.is_empty() {
                continue;
            }
            let characteristic = self.characteristics.get(&id).ok_or_else(|| {
                CoreError::validation(
                    format!("characteristic {id}"),
                    "is not defined in the knowledge base",
                )
            })?;
            if characteristic.kind() != input.kind() {
                return Err(CoreError::validation(
                    characteristic.subject(),
                    format!(
                        "is {}, but a {} value was supplied",
                        characteristic.kind(),
                        input.kind()
                    ),
                ));
            }

            let value = match input {
                FormInput::Numeric(_) => {
                    let parsed = raw.parse::<f64>().map_err(|_| {
                        CoreError::validation(
                            characteristic.subject(),
                            format!("'{raw}' is not a number"),
                        )
                    })?;
                    QueryValue::Numeric(parsed)
                }
                FormInput::Categorical(_) => QueryValue::Categorical(raw.to_string()),
            };
            validate_single_input(characteristic, &value, None)?;
            query.insert(id, value);
        }

        if query.is_empty() {
            return Err(CoreError::EmptyQuery);
        }
        Ok(query)
    }
}
