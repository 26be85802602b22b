pub mod property;
pub mod field_names;
