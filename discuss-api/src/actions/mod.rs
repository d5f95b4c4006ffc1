use discuss_common::form::FieldErrors;
use serde::Serialize;

pub mod create_post;

/// What a form action hands back to be redrawn when it did not complete.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Serialize)]
pub struct FormState {
    pub errors: FieldErrors,
}

impl From<FieldErrors> for FormState {
    fn from(errors: FieldErrors) -> Self {
        Self { errors }
    }
}
