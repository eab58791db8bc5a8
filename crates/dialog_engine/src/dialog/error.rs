use thiserror::Error;

use super::types::DialogId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogError {
    #[error("no dialog factory registered for {type_name}")]
    FactoryNotFound { type_name: &'static str },
    #[error("dialog factory for {expected} produced a {actual}")]
    FactoryTypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("dialog {0} is already tracked")]
    DuplicateInstance(DialogId),
    #[error("dialog {0} is not tracked")]
    UnknownInstance(DialogId),
}
