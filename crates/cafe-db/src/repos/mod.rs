//! Repository modules, one `impl CafeService` block per entity.

pub mod binding;
pub mod characteristic;
pub mod coffee_type;
