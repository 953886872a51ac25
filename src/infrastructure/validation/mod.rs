//! Schema validation adapters

mod schema;

pub use schema::{BuiltinSchemaValidator, SUPPORTED_SCHEMA_VERSIONS};
