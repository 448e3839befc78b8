//! Characteristic registry: global definitions of numeric ranges and categorical value sets.
//!
//! Updates never touch existing bindings. A narrowed global definition can leave
//! bindings out of range; the completeness check reports those until an expert
//! fixes them.

use std::collections::BTreeMap;

use chrono::Utc;

use cafe_core::entities::{Characteristic, CharacteristicDomain};
use cafe_core::enums::CharacteristicKind;
use cafe_core::errors::CoreError;
use cafe_core::ids::CharacteristicId;
use cafe_core::responses::CharacteristicListing;
use cafe_core::validate::{normalize_value_set, validate_domain, validate_global_range, validate_name};

use crate::error::DatabaseError;
use crate::helpers::{finish, name_conflict, parse_datetime, parse_enum};
use crate::service::CafeService;

const SELECT_COLS: &str = "id, name, kind, min_value, max_value, created_at";

/// Build a characteristic from a row; `values` are only read for categorical rows.
fn row_to_characteristic(
    row: &libsql::Row,
    values: &mut BTreeMap<CharacteristicId, Vec<String>>,
) -> Result<Characteristic, DatabaseError> {
    let id: CharacteristicId = row.get(0)?;
    let kind: CharacteristicKind = parse_enum(&row.get::<String>(2)?)?;
    let domain = match kind {
        CharacteristicKind::Numeric => CharacteristicDomain::Numeric {
            min_value: row.get(3)?,
            max_value: row.get(4)?,
        },
        CharacteristicKind::Categorical => CharacteristicDomain::Categorical {
            values: values.remove(&id).unwrap_or_default(),
        },
    };
    Ok(Characteristic {
        id,
        name: row.get(1)?,
        domain,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

/// Replace a characteristic's allowed values, keeping declared order.
async fn write_values(
    conn: &libsql::Connection,
    id: CharacteristicId,
    values: &[String],
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM characteristic_values WHERE characteristic_id = ?1",
        [id],
    )
    .await?;
    for (position, value) in (0_i64..).zip(values) {
        conn.execute(
            "INSERT INTO characteristic_values (characteristic_id, position, value) VALUES (?1, ?2, ?3)",
            libsql::params![id, position, value.as_str()],
        )
        .await?;
    }
    Ok(())
}

impl CafeService {
    /// Register a characteristic. The name is trimmed and must be unique; a
    /// numeric range must be finite with `min <= max`; a categorical value list
    /// must be non-empty with no blank or duplicate entries after trimming.
    ///
    /// # Errors
    ///
    /// `CoreError::Validation` on a bad name or definition, `CoreError::Conflict`
    /// if the name is taken.
    pub async fn create_characteristic(
        &self,
        name: &str,
        domain: CharacteristicDomain,
    ) -> Result<Characteristic, DatabaseError> {
        let name = validate_name("characteristic", name)?;
        let domain = validate_domain(&format!("characteristic '{name}'"), domain)?;

        let now = Utc::now();
        let (min_value, max_value) = match domain {
            CharacteristicDomain::Numeric {
                min_value,
                max_value,
            } => (Some(min_value), Some(max_value)),
            CharacteristicDomain::Categorical { .. } => (None, None),
        };

        let tx = self.db().conn().transaction().await?;
        let result: Result<CharacteristicId, DatabaseError> = async {
            let mut rows = tx
                .query(
                    "INSERT INTO characteristics (name, kind, min_value, max_value, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT (name) DO NOTHING RETURNING id",
                    libsql::params![
                        name.as_str(),
                        domain.kind().as_str(),
                        min_value,
                        max_value,
                        now.to_rfc3339()
                    ],
                )
                .await?;
            let Some(row) = rows.next().await? else {
                return Err(name_conflict(&tx, "characteristics", "characteristic", &name).await);
            };
            let id: CharacteristicId = row.get(0)?;
            drop(rows);
            if let CharacteristicDomain::Categorical { values } = &domain {
                write_values(&tx, id, values).await?;
            }
            Ok(id)
        }
        .await;
        let id = finish(tx, result).await?;

        self.invalidate_completeness();
        tracing::info!(characteristic_id = id, name = %name, kind = %domain.kind(), "created characteristic");
        Ok(Characteristic {
            id,
            name,
            domain,
            created_at: now,
        })
    }

    /// # Errors
    ///
    /// `CoreError::NotFound` if no characteristic has this id.
    pub async fn get_characteristic(
        &self,
        id: CharacteristicId,
    ) -> Result<Characteristic, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM characteristics WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CoreError::not_found("characteristic", id))?;

        let mut values = BTreeMap::new();
        let mut value_rows = self
            .db()
            .conn()
            .query(
                "SELECT value FROM characteristic_values WHERE characteristic_id = ?1 ORDER BY position",
                [id],
            )
            .await?;
        let mut list = Vec::new();
        while let Some(value_row) = value_rows.next().await? {
            list.push(value_row.get::<String>(0)?);
        }
        values.insert(id, list);
        row_to_characteristic(&row, &mut values)
    }

    /// Characteristics partitioned by kind, each list ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn list_characteristics(&self) -> Result<CharacteristicListing, DatabaseError> {
        Ok(CharacteristicListing::partition(
            self.load_characteristics().await?,
        ))
    }

    /// All characteristics keyed by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn characteristics_by_id(
        &self,
    ) -> Result<BTreeMap<CharacteristicId, Characteristic>, DatabaseError> {
        Ok(self
            .load_characteristics()
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect())
    }

    /// Replace a numeric characteristic's global range. Re-applying the same
    /// range changes nothing observable.
    ///
    /// # Errors
    ///
    /// `CoreError::NotFound` for an unknown id, `CoreError::Validation` if the
    /// characteristic is categorical or the range is invalid.
    pub async fn update_numeric_range(
        &self,
        id: CharacteristicId,
        min_value: f64,
        max_value: f64,
    ) -> Result<Characteristic, DatabaseError> {
        let mut characteristic = self.get_characteristic(id).await?;
        let subject = characteristic.subject();
        if characteristic.kind() != CharacteristicKind::Numeric {
            return Err(CoreError::validation(subject, "is categorical and has no numeric range").into());
        }
        validate_global_range(&subject, min_value, max_value)?;

        self.db()
            .conn()
            .execute(
                "UPDATE characteristics SET min_value = ?1, max_value = ?2 WHERE id = ?3",
                libsql::params![min_value, max_value, id],
            )
            .await?;

        characteristic.domain = CharacteristicDomain::Numeric {
            min_value,
            max_value,
        };
        self.invalidate_completeness();
        tracing::info!(characteristic_id = id, min_value, max_value, "updated numeric range");
        Ok(characteristic)
    }

    /// Replace a categorical characteristic's allowed values.
    ///
    /// # Errors
    ///
    /// `CoreError::NotFound` for an unknown id, `CoreError::Validation` if the
    /// characteristic is numeric or the list is empty, blank or has duplicates.
    pub async fn update_categorical_values(
        &self,
        id: CharacteristicId,
        values: &[String],
    ) -> Result<Characteristic, DatabaseError> {
        let mut characteristic = self.get_characteristic(id).await?;
        let subject = characteristic.subject();
        if characteristic.kind() != CharacteristicKind::Categorical {
            return Err(CoreError::validation(subject, "is numeric and has no value set").into());
        }
        let values = normalize_value_set(&subject, values)?;

        let tx = self.db().conn().transaction().await?;
        let result = write_values(&tx, id, &values).await;
        finish(tx, result).await?;

        tracing::info!(characteristic_id = id, count = values.len(), "updated categorical values");
        characteristic.domain = CharacteristicDomain::Categorical { values };
        self.invalidate_completeness();
        Ok(characteristic)
    }

    /// Delete a characteristic that no binding references.
    ///
    /// # Errors
    ///
    /// `CoreError::NotFound` for an unknown id, `CoreError::Conflict` while any
    /// coffee type is still bound to it.
    pub async fn delete_characteristic(&self, id: CharacteristicId) -> Result<(), DatabaseError> {
        let characteristic = self.get_characteristic(id).await?;

        let tx = self.db().conn().transaction().await?;
        let result: Result<(), DatabaseError> = async {
            let mut rows = tx
                .query(
                    "SELECT COUNT(*) FROM bindings WHERE characteristic_id = ?1",
                    [id],
                )
                .await?;
            let in_use: i64 = rows.next().await?.ok_or(DatabaseError::NoResult)?.get(0)?;
            if in_use > 0 {
                return Err(CoreError::conflict(
                    "characteristic",
                    id,
                    format!(
                        "'{}' is still bound to {in_use} coffee type(s)",
                        characteristic.name
                    ),
                )
                .into());
            }
            tx.execute("DELETE FROM characteristics WHERE id = ?1", [id])
                .await?;
            Ok(())
        }
        .await;
        finish(tx, result).await?;

        self.invalidate_completeness();
        tracing::info!(characteristic_id = id, "deleted characteristic");
        Ok(())
    }

    /// Every characteristic ordered by name, values in declared order.
    async fn load_characteristics(&self) -> Result<Vec<Characteristic>, DatabaseError> {
        let mut values: BTreeMap<CharacteristicId, Vec<String>> = BTreeMap::new();
        let mut value_rows = self
            .db()
            .conn()
            .query(
                "SELECT characteristic_id, value FROM characteristic_values
                 ORDER BY characteristic_id, position",
                (),
            )
            .await?;
        while let Some(row) = value_rows.next().await? {
            values
                .entry(row.get::<i64>(0)?)
                .or_default()
                .push(row.get::<String>(1)?);
        }

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM characteristics ORDER BY name"),
                (),
            )
            .await?;
        let mut characteristics = Vec::new();
        while let Some(row) = rows.next().await? {
            characteristics.push(row_to_characteristic(&row, &mut values)?);
        }
        Ok(characteristics)
    }
}
