// src/schema/fixed.rs

use super::types::{ColumnType, Field};

/// Column layout of the appointment export files. The upstream clinic system
/// emits these CSVs with exactly this column order; changing it requires a
/// coordinated redeploy on both sides.
pub fn appointment_fields() -> Vec<Field> {
    use ColumnType::*;
    [
        ("appointment_id", Integer),
        ("patient_id", Integer),
        ("first_name", String),
        ("last_name", String),
        ("gender", String),
        ("date_of_birth", Date),
        ("phone", String),
        ("email", String),
        ("address", String),
        ("city", String),
        ("state", String),
        ("zip_code", String),
        ("insurance_provider", String),
        ("insurance_member_id", String),
        ("provider_id", Integer),
        ("provider_name", String),
        ("department", String),
        ("appointment_date", Date),
        ("scheduled_at", Timestamp),
        ("checked_in_at", Timestamp),
        ("status", String),
        ("visit_reason", String),
    ]
    .into_iter()
    .map(|(name, ty)| Field::new(name, ty))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_twenty_two_columns_in_export_order() {
        let fields = appointment_fields();
        assert_eq!(fields.len(), 22);
        assert_eq!(fields[0], Field::new("appointment_id", ColumnType::Integer));
        assert_eq!(fields[21], Field::new("visit_reason", ColumnType::String));
    }
}
