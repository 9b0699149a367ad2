//! Error types surfaced by the interaction handlers

/// User-correctable input problems. Raised before any state is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Contract address, name and ABI are required")]
    MissingData,

    #[error("Invalid contract address")]
    InvalidAddress,

    #[error("ABI is not valid JSON")]
    MalformedAbi,

    #[error("A contract with this name already exists")]
    DuplicateName,

    #[error("No account selected")]
    MissingAccount,
}

impl ValidationError {
    /// Translation key for the inline message shown next to the form
    pub fn message_key(&self) -> &'static str {
        match self {
            ValidationError::MissingData => "INTERACT_ERROR_MISSING_DATA",
            ValidationError::InvalidAddress => "INTERACT_ERROR_INVALID_ADDRESS",
            ValidationError::MalformedAbi => "INTERACT_ERROR_INVALID_ABI",
            ValidationError::DuplicateName => "INTERACT_ERROR_DUPLICATE_NAME",
            ValidationError::MissingAccount => "INTERACT_ERROR_NO_ACCOUNT",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InteractError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Provider, codec or storage failure on a user action expecting success
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

impl InteractError {
    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            InteractError::Validation(err) => Some(*err),
            InteractError::Collaborator(_) => None,
        }
    }
}

pub type InteractResult<T> = std::result::Result<T, InteractError>;
