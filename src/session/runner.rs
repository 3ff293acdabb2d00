use crate::error::ClientError;
use crate::session::client::SessionClient;
use crate::session::effects::{Interaction, SessionView, Transport};
use std::time::Duration;
use tokio::sync::mpsc;

/// 勝敗・エラー通知を出すまでの待ち時間
pub const DEFAULT_NOTICE_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    CursorLeft,
    CursorRight,
    /// play the cursor column
    Select,
    Click(Interaction),
    Quit,
}

/// Everything the dispatch loop reacts to, in one ordered queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Opened,
    Message(String),
    Closed,
    Failed(String),
    Ui(UiCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Quit,
    /// every producer went away
    Drained,
}

/// Single consumer for the session queue.
///
/// Handles one event at a time, refreshes the view, and only then presents
/// any notices the event raised, after `notice_delay`. The next event is not
/// taken until those notices are shown.
pub async fn run_session<T, V>(
    client: &mut SessionClient<T>,
    view: &mut V,
    events: &mut mpsc::Receiver<SessionEvent>,
    notice_delay: Duration,
) -> Result<SessionOutcome, ClientError>
where
    T: Transport,
    V: SessionView,
{
    view.set_connection_state(client.state());
    view.refresh()?;

    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::Opened => {
                if let Err(e) = client.on_connection_open() {
                    client.on_connection_failed(&e.to_string());
                }
            }
            SessionEvent::Message(raw) => {
                if let Err(e) = client.on_message(view, &raw) {
                    tracing::error!(error = %e, %raw, "failed to process message");
                }
            }
            SessionEvent::Closed => client.on_connection_closed(),
            SessionEvent::Failed(reason) => client.on_connection_failed(&reason),
            SessionEvent::Ui(UiCommand::Quit) => return Ok(SessionOutcome::Quit),
            SessionEvent::Ui(UiCommand::CursorLeft) => view.move_cursor(-1),
            SessionEvent::Ui(UiCommand::CursorRight) => view.move_cursor(1),
            SessionEvent::Ui(UiCommand::Select) => {
                let interaction = view.cursor_interaction();
                submit(client, view, &interaction);
            }
            SessionEvent::Ui(UiCommand::Click(interaction)) => {
                submit(client, view, &interaction);
            }
        }

        view.set_connection_state(client.state());
        view.refresh()?;

        if client.has_pending_notices() {
            tokio::time::sleep(notice_delay).await;
            for notice in client.take_notices() {
                view.show_notice(notice);
            }
            view.refresh()?;
        }
    }

    Ok(SessionOutcome::Drained)
}

fn submit<T: Transport, V: SessionView>(
    client: &mut SessionClient<T>,
    view: &mut V,
    interaction: &Interaction,
) {
    // 通知表示中の操作は通知を閉じるだけ
    if view.has_notice() {
        view.dismiss_notice();
        return;
    }
    if let Err(e) = client.send_move(interaction) {
        tracing::warn!(error = %e, "move not sent");
    }
}
