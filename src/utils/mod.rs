pub mod base62;
pub mod url_validator;

pub use base62::{decode, encode};
