use crate::error::ClientError;
use crate::network::protocol::{InboundEvent, OutboundEvent};
use crate::session::effects::{
    BoardSurface, ConnectionState, Interaction, LinkAffordances, Notice, Transport,
};
use crate::session::role::RoleContext;

/// Session protocol client.
///
/// Owns the send side of the connection and the role chosen at startup.
/// Inbound frames are handed to [`SessionClient::on_message`] one at a time
/// in arrival order. Win and error notices are queued here and presented
/// by the dispatch loop once the current message has been handled.
pub struct SessionClient<T: Transport> {
    role: RoleContext,
    state: ConnectionState,
    transport: T,
    pending_notices: Vec<Notice>,
}

impl<T: Transport> SessionClient<T> {
    pub fn new(role: RoleContext, transport: T) -> Self {
        Self {
            role,
            state: ConnectionState::Connecting,
            transport,
            pending_notices: Vec::new(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Connecting -> Open。ロールを確立するイベントをちょうど一度だけ送る
    pub fn on_connection_open(&mut self) -> Result<(), ClientError> {
        if self.state != ConnectionState::Connecting {
            tracing::warn!(state = ?self.state, "ignoring repeated open signal");
            return Ok(());
        }
        self.state = ConnectionState::Open;
        tracing::info!(role = %self.role.label(), "connected to server");

        let event = self.role.establish_event();
        tracing::debug!(event = event.kind(), "establishing role");
        self.transport.send(event)
    }

    pub fn on_connection_closed(&mut self) {
        if !self.state.is_terminal() {
            tracing::info!("connection closed");
            self.state = ConnectionState::Closed;
        }
    }

    pub fn on_connection_failed(&mut self, reason: &str) {
        if !self.state.is_terminal() {
            tracing::error!(%reason, "connection failed");
            self.state = ConnectionState::Errored;
        }
    }

    /// Sends `play` for the column the interaction hit.
    ///
    /// Returns whether an event went out. Gestures that miss the grid, that
    /// arrive outside `Open`, or that come from a spectator send nothing.
    pub fn send_move(&mut self, interaction: &Interaction) -> Result<bool, ClientError> {
        if self.state != ConnectionState::Open {
            tracing::debug!(state = ?self.state, "dropping interaction");
            return Ok(false);
        }
        if self.role.is_spectator() {
            return Ok(false);
        }
        let Some(tag) = interaction.column.as_deref() else {
            return Ok(false);
        };

        let column: i64 = tag
            .trim()
            .parse()
            .map_err(|_| ClientError::InvalidColumnTag(tag.to_string()))?;
        tracing::debug!(column, "playing move");
        self.transport.send(OutboundEvent::Play { column })?;
        Ok(true)
    }

    /// 受信メッセージを一件処理する
    pub fn on_message<V>(&mut self, view: &mut V, raw: &str) -> Result<(), ClientError>
    where
        V: BoardSurface + LinkAffordances,
    {
        if self.state != ConnectionState::Open {
            tracing::debug!(state = ?self.state, "dropping message");
            return Ok(());
        }

        let event = InboundEvent::decode(raw)?;
        tracing::debug!(?event, "received event");

        match event {
            InboundEvent::Init { join, watch } => {
                view.set_join_link(&join);
                view.set_watch_link(&watch);
            }
            InboundEvent::Play {
                player,
                column,
                row,
            } => {
                // 盤面側のエラーは記録するだけ。状態の正はサーバー
                if let Err(e) = view.play_move(player, column, row) {
                    tracing::warn!(error = %e, "board rejected move");
                }
            }
            InboundEvent::Win { player } => {
                self.pending_notices.push(Notice::win(&player));
            }
            InboundEvent::Error { message } => {
                self.pending_notices.push(Notice::error(message));
            }
        }
        Ok(())
    }

    pub fn has_pending_notices(&self) -> bool {
        !self.pending_notices.is_empty()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending_notices)
    }
}
