use devsync_playground::PlaygroundError;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Config error in '{path}': {message}")]
    Config { path: String, message: String },

    #[error("Project file error in '{path}': {message}")]
    Project { path: String, message: String },

    #[error("Credential store error: {0}")]
    Credentials(String),

    #[error("Token rejected: {0}")]
    Token(String),

    #[error("Login rejected: {0}")]
    LoginRejected(String),

    #[error("Unknown route '{0}'")]
    UnknownRoute(String),

    #[error(transparent)]
    Playground(#[from] PlaygroundError),
}

impl From<jsonwebtoken::errors::Error> for ClientError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ClientError::Token(err.to_string())
    }
}
