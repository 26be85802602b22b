pub mod value;
pub mod date;
