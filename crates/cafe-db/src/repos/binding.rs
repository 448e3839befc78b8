//! Coffee type bindings: which characteristics a type uses and how it narrows them.
//!
//! The `(coffee_type_id, characteristic_id)` pair is unique. `bind` is an upsert
//! that keeps the binding's original position, `unbind` is idempotent, and
//! `replace_bindings` swaps a type's whole set atomically.

use std::collections::BTreeMap;

use chrono::Utc;

use cafe_core::entities::{BindingList, Characteristic, CharacteristicBinding, Narrowing};
use cafe_core::enums::CharacteristicKind;
use cafe_core::errors::CoreError;
use cafe_core::ids::{CharacteristicId, CoffeeTypeId};
use cafe_core::responses::CoffeeTypeProfile;
use cafe_core::validate::validate_narrowing;

use crate::error::DatabaseError;
use crate::helpers::{finish, parse_datetime, parse_enum};
use crate::service::CafeService;

const SELECT_COLS: &str =
    "b.id, b.coffee_type_id, b.characteristic_id, b.kind, b.min_value, b.max_value, b.created_at";

fn row_to_binding(
    row: &libsql::Row,
    values: &mut BTreeMap<i64, Vec<String>>,
) -> Result<CharacteristicBinding, DatabaseError> {
    let binding_id: i64 = row.get(0)?;
    let kind: CharacteristicKind = parse_enum(&row.get::<String>(3)?)?;
    let narrowing = match kind {
        CharacteristicKind::Numeric => Narrowing::Numeric {
            min_value: row.get::<Option<f64>>(4)?,
            max_value: row.get::<Option<f64>>(5)?,
        },
        CharacteristicKind::Categorical => Narrowing::Categorical {
            values: values.remove(&binding_id).unwrap_or_default(),
        },
    };
    Ok(CharacteristicBinding {
        coffee_type_id: row.get(1)?,
        characteristic_id: row.get(2)?,
        narrowing,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

/// Replace a binding's local value set, keeping the given order.
async fn write_binding_values(
    conn: &libsql::Connection,
    binding_id: i64,
    values: &[String],
) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM binding_values WHERE binding_id = ?1", [binding_id])
        .await?;
    for (position, value) in (0_i64..).zip(values) {
        conn.execute(
            "INSERT INTO binding_values (binding_id, position, value) VALUES (?1, ?2, ?3)",
            libsql::params![binding_id, position, value.as_str()],
        )
        .await?;
    }
    Ok(())
}

/// Insert or overwrite one binding and its value set; returns its `created_at`.
async fn upsert_binding(
    conn: &libsql::Connection,
    coffee_type_id: CoffeeTypeId,
    characteristic_id: CharacteristicId,
    narrowing: &Narrowing,
) -> Result<String, DatabaseError> {
    let (min_value, max_value, values): (Option<f64>, Option<f64>, &[String]) = match narrowing {
        Narrowing::Numeric {
            min_value,
            max_value,
        } => (*min_value, *max_value, &[]),
        Narrowing::Categorical { values } => (None, None, values),
    };

    let mut rows = conn
        .query(
            "INSERT INTO bindings (coffee_type_id, characteristic_id, kind, min_value, max_value, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (coffee_type_id, characteristic_id)
             DO UPDATE SET min_value = excluded.min_value, max_value = excluded.max_value
             RETURNING id, created_at",
            libsql::params![
                coffee_type_id,
                characteristic_id,
                narrowing.kind().as_str(),
                min_value,
                max_value,
                Utc::now().to_rfc3339()
            ],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    let binding_id: i64 = row.get(0)?;
    let created_at: String = row.get(1)?;
    drop(rows);

    write_binding_values(conn, binding_id, values).await?;
    Ok(created_at)
}

impl CafeService {
    /// Record that a coffee type uses a characteristic without narrowing it yet.
    ///
    /// The new binding has no bounds (numeric) or an empty value set (categorical)
    /// and is reported as incomplete until [`Self::bind`] fills it in. An existing
    /// binding for the pair is returned unchanged.
    ///
    /// # Errors
    ///
    /// `CoreError::NotFound` for an unknown coffee type, `CoreError::Validation`
    /// for an unknown characteristic.
    pub async fn attach(
        &self,
        coffee_type_id: CoffeeTypeId,
        characteristic_id: CharacteristicId,
    ) -> Result<CharacteristicBinding, DatabaseError> {
        self.get_coffee_type(coffee_type_id).await?;
        let characteristic = self.bound_characteristic(characteristic_id).await?;

        let inserted = self
            .db()
            .conn()
            .execute(
                "INSERT INTO bindings (coffee_type_id, characteristic_id, kind, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (coffee_type_id, characteristic_id) DO NOTHING",
                libsql::params![
                    coffee_type_id,
                    characteristic_id,
                    characteristic.kind().as_str(),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;

        if inserted > 0 {
            self.invalidate_completeness();
            tracing::info!(coffee_type_id, characteristic_id, "attached characteristic");
        }
        self.get_binding(coffee_type_id, characteristic_id).await
    }

    /// Set a coffee type's narrowing of a characteristic, creating the binding if
    /// needed. Re-binding a pair overwrites its narrowing in place.
    ///
    /// # Errors
    ///
    /// `CoreError::NotFound` for an unknown coffee type. `CoreError::Validation` for
    /// an unknown characteristic, a kind mismatch, or a narrowing outside the
    /// characteristic's global range / value set.
    pub async fn bind(
        &self,
        coffee_type_id: CoffeeTypeId,
        characteristic_id: CharacteristicId,
        narrowing: Narrowing,
    ) -> Result<CharacteristicBinding, DatabaseError> {
        self.get_coffee_type(coffee_type_id).await?;
        let characteristic = self.bound_characteristic(characteristic_id).await?;
        let narrowing = validate_narrowing(&characteristic, &narrowing)?;

        let tx = self.db().conn().transaction().await?;
        let result = upsert_binding(&tx, coffee_type_id, characteristic_id, &narrowing).await;
        let created_at = finish(tx, result).await?;

        self.invalidate_completeness();
        tracing::info!(coffee_type_id, characteristic_id, kind = %narrowing.kind(), "bound characteristic");
        Ok(CharacteristicBinding {
            coffee_type_id,
            characteristic_id,
            narrowing,
            created_at: parse_datetime(&created_at)?,
        })
    }

    /// Replace a coffee type's whole binding set in one transaction.
    ///
    /// Every entry is validated before anything is written; one bad entry leaves
    /// the previous set untouched. An empty slice removes every binding.
    ///
    /// # Errors
    ///
    /// `CoreError::NotFound` for an unknown coffee type. `CoreError::Validation` for
    /// a repeated or unknown characteristic, a kind mismatch, or a narrowing
    /// outside the characteristic's global range / value set.
    pub async fn replace_bindings(
        &self,
        coffee_type_id: CoffeeTypeId,
        entries: &[(CharacteristicId, Narrowing)],
    ) -> Result<BindingList, DatabaseError> {
        self.get_coffee_type(coffee_type_id).await?;
        let characteristics = self.characteristics_by_id().await?;

        let mut validated: Vec<(CharacteristicId, Narrowing)> = Vec::with_capacity(entries.len());
        for (characteristic_id, narrowing) in entries {
            if validated.iter().any(|(id, _)| id == characteristic_id) {
                return Err(CoreError::validation(
                    format!("characteristic {characteristic_id}"),
                    "is listed more than once",
                )
                .into());
            }
            let characteristic = characteristics.get(characteristic_id).ok_or_else(|| {
                CoreError::validation(
                    format!("characteristic {characteristic_id}"),
                    "is not defined in the knowledge base",
                )
            })?;
            validated.push((
                *characteristic_id,
                validate_narrowing(characteristic, narrowing)?,
            ));
        }

        let tx = self.db().conn().transaction().await?;
        let result: Result<(), DatabaseError> = async {
            // Bindings' value sets go with them via ON DELETE CASCADE.
            tx.execute(
                "DELETE FROM bindings WHERE coffee_type_id = ?1",
                [coffee_type_id],
            )
            .await?;
            for (characteristic_id, narrowing) in &validated {
                upsert_binding(&tx, coffee_type_id, *characteristic_id, narrowing).await?;
            }
            Ok(())
        }
        .await;
        finish(tx, result).await?;

        self.invalidate_completeness();
        tracing::info!(coffee_type_id, bindings = validated.len(), "replaced binding set");
        self.list_for_type(coffee_type_id).await
    }

    /// Remove a coffee type's binding to a characteristic. Removing a pair that is
    /// not bound is not an error; the return value says whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails.
    pub async fn unbind(
        &self,
        coffee_type_id: CoffeeTypeId,
        characteristic_id: CharacteristicId,
    ) -> Result<bool, DatabaseError> {
        let deleted = self
            .db()
            .conn()
            .execute(
                "DELETE FROM bindings WHERE coffee_type_id = ?1 AND characteristic_id = ?2",
                libsql::params![coffee_type_id, characteristic_id],
            )
            .await?;
        if deleted > 0 {
            self.invalidate_completeness();
            tracing::info!(coffee_type_id, characteristic_id, "unbound characteristic");
        }
        Ok(deleted > 0)
    }

    /// A coffee type's bindings in creation order, partitioned by kind.
    ///
    /// # Errors
    ///
    /// `CoreError::NotFound` for an unknown coffee type.
    pub async fn list_for_type(
        &self,
        coffee_type_id: CoffeeTypeId,
    ) -> Result<BindingList, DatabaseError> {
        self.get_coffee_type(coffee_type_id).await?;
        let bindings = self.load_bindings(Some(coffee_type_id)).await?;
        Ok(BindingList::partition(bindings))
    }

    /// A coffee type with its bindings joined to characteristic names.
    ///
    /// # Errors
    ///
    /// `CoreError::NotFound` for an unknown coffee type.
    pub async fn coffee_type_profile(
        &self,
        coffee_type_id: CoffeeTypeId,
    ) -> Result<CoffeeTypeProfile, DatabaseError> {
        let coffee_type = self.get_coffee_type(coffee_type_id).await?;
        let bindings = self.load_bindings(Some(coffee_type_id)).await?;
        let characteristics = self.characteristics_by_id().await?;
        Ok(CoffeeTypeProfile::build(
            &coffee_type,
            &bindings,
            &characteristics,
        ))
    }

    /// Every binding grouped by coffee type, each group in creation order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn bindings_by_type(
        &self,
    ) -> Result<BTreeMap<CoffeeTypeId, Vec<CharacteristicBinding>>, DatabaseError> {
        let mut grouped: BTreeMap<CoffeeTypeId, Vec<CharacteristicBinding>> = BTreeMap::new();
        for binding in self.load_bindings(None).await? {
            grouped
                .entry(binding.coffee_type_id)
                .or_default()
                .push(binding);
        }
        Ok(grouped)
    }

    async fn get_binding(
        &self,
        coffee_type_id: CoffeeTypeId,
        characteristic_id: CharacteristicId,
    ) -> Result<CharacteristicBinding, DatabaseError> {
        self.load_bindings(Some(coffee_type_id))
            .await?
            .into_iter()
            .find(|b| b.characteristic_id == characteristic_id)
            .ok_or(DatabaseError::NoResult)
    }

    /// A binding may only reference an existing characteristic.
    async fn bound_characteristic(
        &self,
        characteristic_id: CharacteristicId,
    ) -> Result<Characteristic, DatabaseError> {
        match self.get_characteristic(characteristic_id).await {
            Err(DatabaseError::Core(CoreError::NotFound { .. })) => Err(CoreError::validation(
                format!("characteristic {characteristic_id}"),
                "is not defined in the knowledge base",
            )
            .into()),
            other => other,
        }
    }

    async fn load_bindings(
        &self,
        coffee_type_id: Option<CoffeeTypeId>,
    ) -> Result<Vec<CharacteristicBinding>, DatabaseError> {
        let (filter, params): (&str, Vec<libsql::Value>) = match coffee_type_id {
            Some(id) => ("WHERE b.coffee_type_id = ?1", vec![id.into()]),
            None => ("", Vec::new()),
        };

        let mut values: BTreeMap<i64, Vec<String>> = BTreeMap::new();
        let mut value_rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT v.binding_id, v.value FROM binding_values v
                     JOIN bindings b ON b.id = v.binding_id
                     {filter}
                     ORDER BY v.binding_id, v.position"
                ),
                libsql::params_from_iter(params.clone()),
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
                &format!("SELECT {SELECT_COLS} FROM bindings b {filter} ORDER BY b.id"),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut bindings = Vec::new();
        while let Some(row) = rows.next().await? {
            bindings.push(row_to_binding(&row, &mut values)?);
        }
        Ok(bindings)
    }
}
