pub mod definitions;
pub mod types;
