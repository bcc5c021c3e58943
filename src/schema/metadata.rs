// src/schema/metadata.rs

use anyhow::{bail, Result};
use serde_json::Value;

use super::types::Field;

/// Build column definitions from an already-decoded `schema` metadata value.
///
/// The caller handles the decode step so that a value that is not JSON at
/// all can be skipped, while a decoded value that is not an array of
/// `{"Name": ..., "Type": ...}` objects is an unrecoverable configuration
/// error and fails the whole invocation.
pub fn fields_from_json(value: &Value) -> Result<Vec<Field>> {
    let items = match value.as_array() {
        Some(items) => items,
        None => bail!("schema metadata is not a JSON array: {}", value),
    };

    let mut fields = Vec::with_capacity(items.len());
    for item in items {
        let name = item.get("Name").and_then(Value::as_str).unwrap_or("");
        let ty = item.get("Type").and_then(Value::as_str).unwrap_or("");
        if name.is_empty() || ty.is_empty() {
            bail!("invalid field in schema metadata: {}", item);
        }
        fields.push(Field::new(name, ty.parse()?));
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    #[test]
    fn decodes_well_formed_array() {
        let value: Value =
            serde_json::from_str(r#"[{"Name":"id","Type":"INTEGER"},{"Name":"city","Type":"STRING"}]"#)
                .unwrap();
        let fields = fields_from_json(&value).unwrap();
        assert_eq!(
            fields,
            vec![
                Field::new("id", ColumnType::Integer),
                Field::new("city", ColumnType::String),
            ]
        );
    }

    #[test]
    fn missing_name_is_an_error() {
        let value: Value = serde_json::from_str(r#"[{"Type":"INTEGER"}]"#).unwrap();
        assert!(fields_from_json(&value).is_err());
    }

    #[test]
    fn empty_type_is_an_error() {
        let value: Value = serde_json::from_str(r#"[{"Name":"id","Type":""}]"#).unwrap();
        assert!(fields_from_json(&value).is_err());
    }

    #[test]
    fn non_array_is_an_error() {
        let value: Value = serde_json::from_str(r#"{"Name":"id","Type":"INTEGER"}"#).unwrap();
        assert!(fields_from_json(&value).is_err());
    }

    #[test]
    fn unknown_type_name_is_an_error() {
        let value: Value = serde_json::from_str(r#"[{"Name":"id","Type":"VARCHAR"}]"#).unwrap();
        assert!(fields_from_json(&value).is_err());
    }
}
