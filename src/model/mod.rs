pub mod json;
pub mod schema;
pub mod source;
