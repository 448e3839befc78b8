//! Identifier aliases.
//!
//! Both identifiers are storage-assigned integers (SQLite `INTEGER PRIMARY KEY`).

/// Identifier of a [`Characteristic`](crate::entities::Characteristic).
pub type CharacteristicId = i64;

/// Identifier of a [`CoffeeType`](crate::entities::CoffeeType).
pub type CoffeeTypeId = i64;
