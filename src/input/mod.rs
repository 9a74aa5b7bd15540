//! User input handling: URL validation, credential checks and URL
//! normalization.

pub mod error;
pub mod normalize;
pub mod validate;

pub use error::InputError;
pub use normalize::normalize_url;
pub use validate::{validate_api_key, validate_url};
