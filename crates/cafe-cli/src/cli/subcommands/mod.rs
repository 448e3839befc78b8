mod binding;
mod characteristic;
mod coffee_type;

pub use binding::BindingCommands;
pub use characteristic::{CharacteristicCommands, RangeArgs};
pub use coffee_type::CoffeeTypeCommands;
