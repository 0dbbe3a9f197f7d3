use wander_core::CoreError;

#[derive(Debug)]
pub enum AppError {
    UsageError(String),
    NotFoundError(String),
    Anyhow(anyhow::Error),
}

impl AppError {
    /// Text shown to the user; collaborator details stay in the logs
    pub fn user_message(&self) -> String {
        match self {
            AppError::UsageError(msg) => msg.clone(),
            AppError::NotFoundError(msg) => format!("Not found: {}", msg),
            AppError::Anyhow(err) => match err.downcast_ref::<CoreError>() {
                Some(CoreError::CollaboratorError(msg)) => {
                    tracing::error!("Collaborator failure surfaced to user: {}", msg);
                    "The offer service did not respond; nothing was changed. Please try again.".to_string()
                }
                Some(core) => core.to_string(),
                None => {
                    tracing::error!("Internal error: {}", err);
                    "Internal error".to_string()
                }
            },
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.user_message())
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Anyhow(err.into())
    }
}
