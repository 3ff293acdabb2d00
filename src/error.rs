use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// 未知のタグ。クライアントとサーバーのプロトコル不一致
    #[error("unknown event type: {0}")]
    UnknownEvent(String),
    #[error("event has no string `type` field")]
    MissingType,
    #[error("failed to decode event: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("interaction column tag {0:?} is not an integer")]
    InvalidColumnTag(String),
    #[error("websocket error: {0}")]
    Transport(#[from] Box<tokio_tungstenite::tungstenite::Error>),
    #[error("session channel closed")]
    ChannelClosed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        ClientError::Transport(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
