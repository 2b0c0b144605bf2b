mod json_helper;
pub mod lenient;

pub use json_helper::{read_json, write_json};
