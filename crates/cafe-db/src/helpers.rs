//! Row parsing and transaction helpers shared by the repos.

use chrono::{DateTime, Utc};

use cafe_core::errors::CoreError;

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with all cafe-core enums that use `#[serde(rename_all = "snake_case")]`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Commit `tx` if `result` is `Ok`, roll it back otherwise.
///
/// # Errors
///
/// Returns the original error, or `DatabaseError::LibSql` if the commit fails.
pub async fn finish<T>(
    tx: libsql::Transaction,
    result: Result<T, DatabaseError>,
) -> Result<T, DatabaseError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(%rollback, "transaction rollback failed");
            }
            Err(error)
        }
    }
}

/// Conflict error for a `name` already taken in `table`, naming the existing row.
///
/// Used after an `INSERT ... ON CONFLICT (name) DO NOTHING RETURNING id` came back
/// empty. A failed lookup is returned as-is.
pub async fn name_conflict(
    conn: &libsql::Connection,
    table: &str,
    entity_type: &str,
    name: &str,
) -> DatabaseError {
    let existing: Result<i64, DatabaseError> = async {
        let mut rows = conn
            .query(&format!("SELECT id FROM {table} WHERE name = ?1"), [name])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get(0)?)
    }
    .await;
    match existing {
        Ok(id) => CoreError::conflict(
            entity_type,
            id,
            format!("a {entity_type} named '{name}' already exists"),
        )
        .into(),
        Err(error) => error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cafe_core::enums::CharacteristicKind;

    #[test]
    fn parses_both_datetime_formats() {
        assert!(parse_datetime("2026-02-09T14:30:00+00:00").is_ok());
        assert!(parse_datetime("2026-02-09 14:30:00").is_ok());
        assert!(parse_datetime("yesterday").is_err());
    }

    #[tokio::test]
    async fn name_conflict_names_the_existing_row() {
        let db = crate::CafeDb::open_local(":memory:").await.unwrap();
        db.conn()
            .execute(
                "INSERT INTO coffee_types (name, created_at) VALUES ('Arabica', '2026-02-09 14:30:00')",
                (),
            )
            .await
            .unwrap();

        let err = name_conflict(db.conn(), "coffee_types", "coffee type", "Arabica").await;
        assert!(matches!(err, DatabaseError::Core(CoreError::Conflict { .. })));
        assert!(err.to_string().contains("'Arabica' already exists"), "{err}");

        let missing = name_conflict(db.conn(), "coffee_types", "coffee type", "Robusta").await;
        assert!(matches!(missing, DatabaseError::NoResult));
    }

    #[test]
    fn parses_kind() {
        let kind: CharacteristicKind = parse_enum("categorical").unwrap();
        assert_eq!(kind, CharacteristicKind::Categorical);
        assert!(parse_enum::<CharacteristicKind>("textual").is_err());
    }
}
