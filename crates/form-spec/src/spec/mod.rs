pub mod field;
pub mod form;
pub mod layout;

pub use field::{
    DependentFieldFilter, FieldDefinition, FieldKind, FieldOption, FieldValidation, Filter,
};
pub use form::{FieldGroup, FormDefinition, FormMetaData, RichText};
pub use layout::FormLayout;
