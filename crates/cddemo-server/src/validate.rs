use std::fmt;

use cddemo_types::{FieldValue, ResourceBody};

use crate::error::{ApiError, ErrorCode};
use crate::schema::ResourceSchema;

/// Request operation a body is validated for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("create"),
            Self::Update => f.write_str("update"),
        }
    }
}

/// Check a decoded body against the schema's field descriptors.
///
/// Required fields must be set (see [`FieldValue::is_unset`]); set fields
/// must carry the declared kind.
pub fn check_object_fields(
    schema: &ResourceSchema,
    body: &ResourceBody,
    op: Operation,
) -> Result<(), ApiError> {
    let values = body.field_values();
    for field in schema.fields {
        let value = values.get(field.name).unwrap_or(&FieldValue::Null);
        if value.is_unset() {
            if field.required {
                return Err(ApiError::new(
                    ErrorCode::MissingRequired,
                    format!("field {} must be set when {op}", field.name),
                ));
            }
            continue;
        }
        if value.kind() != Some(field.kind) {
            return Err(ApiError::new(
                ErrorCode::InvalidFormat,
                format!("field {} should be {:?}", field.name, field.kind),
            ));
        }
    }
    Ok(())
}
