//! Seams between the session and the things it drives.
//!
//! The terminal view implements the display-side traits. The network client
//! implements [`Transport`]. Tests use recording fakes.

use crate::core::{BoardError, PlayerId};
use crate::error::ClientError;
use crate::network::protocol::OutboundEvent;
use chrono::{DateTime, Local};

pub trait Transport {
    fn send(&mut self, event: OutboundEvent) -> Result<(), ClientError>;
}

pub trait BoardSurface {
    fn play_move(&mut self, player: PlayerId, column: i64, row: i64) -> Result<(), BoardError>;
}

pub trait LinkAffordances {
    fn set_join_link(&mut self, code: &str);
    fn set_watch_link(&mut self, code: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Win,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub raised_at: DateTime<Local>,
}

impl Notice {
    pub fn win(player: &PlayerId) -> Self {
        Self::new(NoticeKind::Win, format!("Player {} wins!", player))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Notice {
            kind,
            text: text.into(),
            raised_at: Local::now(),
        }
    }
}

pub trait Notifier {
    fn show_notice(&mut self, notice: Notice);
}

/// 接続状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
    Errored,
}

impl ConnectionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ConnectionState::Closed | ConnectionState::Errored)
    }
}

/// What the dispatch loop needs from the host UI on top of the
/// collaborator traits.
pub trait SessionView: BoardSurface + LinkAffordances + Notifier {
    fn set_connection_state(&mut self, state: ConnectionState);
    fn move_cursor(&mut self, delta: i32);
    /// 現在のカーソル列を指すインタラクション
    fn cursor_interaction(&self) -> Interaction;
    fn has_notice(&self) -> bool;
    fn dismiss_notice(&mut self);
    fn refresh(&mut self) -> std::io::Result<()>;
}

/// A user gesture on the board surface. `column` is the tag of the cell
/// that was hit, as text, or `None` when the gesture missed every cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interaction {
    pub column: Option<String>,
}

impl Interaction {
    pub fn on_column(column: usize) -> Self {
        Interaction {
            column: Some(column.to_string()),
        }
    }

    pub fn off_board() -> Self {
        Interaction { column: None }
    }
}
