use thiserror::Error;

/// Errors raised while rendering, editing or submitting a form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// The schema names a dependent-field operator this engine cannot evaluate.
    #[error("unsupported dependent field filter operator '{operator}'")]
    UnsupportedFilterOperator { operator: String },
    #[error("form '{form_id}' is missing its portal id or guid")]
    InvalidConfiguration { form_id: String },
    #[error("field '{0}' is not part of the form")]
    UnknownField(String),
    #[error("field '{field}' has no renderer for type '{field_type}'")]
    UnsupportedFieldType { field: String, field_type: String },
    #[error("{edit} edits do not apply to {field_type} field '{field}'")]
    EditMismatch {
        field: String,
        field_type: String,
        edit: &'static str,
    },
}
