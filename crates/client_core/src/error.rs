use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response.
    #[error("{0}")]
    Transport(String),
    #[error("request failed with status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ClientError {
    /// User-facing reason: the server's `message` when it sent one, else the
    /// transport-level description.
    pub fn reason(&self) -> String {
        match self {
            ClientError::Transport(message) | ClientError::Decode(message) => message.clone(),
            ClientError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            ClientError::Api {
                status,
                message: None,
            } => format!("Request failed with status code {status}"),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("unknown route: {0}")]
    Unknown(String),
    #[error("missing organisation id in route: {0}")]
    MissingId(String),
}
