//! Request-side business rules.
//!
//! Services here run before any store access; persistence itself goes through
//! [`crate::db::services`].

pub mod validation;

pub use validation::{
    malformed_body, validate_create, validate_task_id, validate_update, FieldError,
    FieldLocation, ValidationErrors,
};
