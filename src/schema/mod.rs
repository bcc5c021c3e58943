pub mod fixed;
pub mod metadata;
pub mod types;

pub use fixed::appointment_fields;
pub use metadata::fields_from_json;
pub use types::{ColumnType, Field};
