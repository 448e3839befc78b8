pub mod analyze;
pub mod binding;
pub mod characteristic;
pub mod coffee_type;
pub mod dispatch;
pub mod knowledge_base;
pub mod shared;
