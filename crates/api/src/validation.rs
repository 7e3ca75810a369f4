use crate::error::ApiError;
use validator::Validate;

/// Runs derive-based request validation; the error names every offending field.
pub fn validate<T: Validate>(value: &T) -> Result<(), ApiError> {
    value.validate().map_err(|errors| {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        ApiError::Validation(format!("invalid fields: {}", fields.join(", ")))
    })
}
