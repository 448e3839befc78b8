//! Coffee type repository: create, read, list and cascading delete.

use chrono::Utc;

use cafe_core::entities::CoffeeType;
use cafe_core::errors::CoreError;
use cafe_core::ids::CoffeeTypeId;
use cafe_core::validate::validate_name;

use crate::error::DatabaseError;
use crate::helpers::{name_conflict, parse_datetime};
use crate::service::CafeService;

const SELECT_COLS: &str = "id, name, created_at";

fn row_to_coffee_type(row: &libsql::Row) -> Result<CoffeeType, DatabaseError> {
    Ok(CoffeeType {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: parse_datetime(&row.get::<String>(2)?)?,
    })
}

impl CafeService {
    /// Create a coffee type. The name is trimmed.
    ///
    /// # Errors
    ///
    /// `CoreError::Validation` on a blank name, `CoreError::Conflict` if the name is taken.
    pub async fn create_coffee_type(&self, name: &str) -> Result<CoffeeType, DatabaseError> {
        let name = validate_name("coffee type", name)?;

        let now = Utc::now();
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO coffee_types (name, created_at) VALUES (?1, ?2)
                 ON CONFLICT (name) DO NOTHING RETURNING id",
                libsql::params![name.as_str(), now.to_rfc3339()],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Err(name_conflict(self.db().conn(), "coffee_types", "coffee type", &name).await);
        };
        let coffee_type = CoffeeType {
            id: row.get(0)?,
            name,
            created_at: now,
        };

        self.invalidate_completeness();
        tracing::info!(coffee_type_id = coffee_type.id, name = %coffee_type.name, "created coffee type");
        Ok(coffee_type)
    }

    /// # Errors
    ///
    /// `CoreError::NotFound` if no coffee type has this id.
    pub async fn get_coffee_type(&self, id: CoffeeTypeId) -> Result<CoffeeType, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM coffee_types WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CoreError::not_found("coffee type", id))?;
        row_to_coffee_type(&row)
    }

    /// All coffee types ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_coffee_types(&self) -> Result<Vec<CoffeeType>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM coffee_types ORDER BY name"),
                (),
            )
            .await?;
        let mut coffee_types = Vec::new();
        while let Some(row) = rows.next().await? {
            coffee_types.push(row_to_coffee_type(&row)?);
        }
        Ok(coffee_types)
    }

    /// Delete a coffee type together with all of its bindings.
    ///
    /// # Errors
    ///
    /// `CoreError::NotFound` if no coffee type has this id.
    pub async fn delete_coffee_type(&self, id: CoffeeTypeId) -> Result<(), DatabaseError> {
        // Bindings and their values go with the row via ON DELETE CASCADE.
        let deleted = self
            .db()
            .conn()
            .execute("DELETE FROM coffee_types WHERE id = ?1", [id])
            .await?;
        if deleted == 0 {
            return Err(CoreError::not_found("coffee type", id).into());
        }

        self.invalidate_completeness();
        tracing::info!(coffee_type_id = id, "deleted coffee type");
        Ok(())
    }
}
