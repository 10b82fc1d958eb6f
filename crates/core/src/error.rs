use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for CoreError {
    /// Flatten derive-level field errors into a single readable message,
    /// e.g. `"title: length; slug: slug_format"`.
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut parts: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let codes: Vec<String> = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                format!("{field}: {}", codes.join(", "))
            })
            .collect();
        parts.sort();
        CoreError::Validation(parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use validator::{ValidationError, ValidationErrors};

    #[test]
    fn validation_errors_flatten_sorted_by_field() {
        let mut errors = ValidationErrors::new();
        errors.add("title", ValidationError::new("length"));
        errors.add("slug", ValidationError::new("slug_format"));

        let err = CoreError::from(errors);
        assert_matches!(err, CoreError::Validation(ref msg) if msg == "slug: slug_format; title: length");
    }

    #[test]
    fn not_found_display_names_entity() {
        let err = CoreError::NotFound {
            entity: "Lesson",
            id: 9,
        };
        assert_eq!(err.to_string(), "Entity not found: Lesson with id 9");
    }
}
