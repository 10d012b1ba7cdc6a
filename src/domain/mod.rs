//! Domain layer: request shaping, validation, and envelope types (no I/O).

pub mod constraint;
pub mod request;
pub mod response;
pub mod sanitize;
pub mod schema;
mod validation;

pub use request::{API_VERSION_PREFIX, Method, RequestDescriptor, build_path, build_uri};
pub use response::{
    DeserializationError, DeserializationErrorKind, Envelope, ErrorRecord, Meta,
};
pub use sanitize::remove_null_values;
pub use schema::{Field, Schema, ValueRule, ValueType};
pub use validation::ValidationError;
