pub mod parse;
pub mod role;
