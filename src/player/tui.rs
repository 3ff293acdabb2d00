use crate::core::Board;
use crate::display::column_at;
use crate::session::effects::Interaction;
use crate::session::runner::{SessionEvent, UiCommand};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// キー・マウス入力を UI コマンドに変換する
pub fn translate(event: &Event, board: &Board) -> Option<UiCommand> {
    match event {
        Event::Key(KeyEvent {
            code, modifiers, ..
        }) => match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(UiCommand::Quit)
            }
            KeyCode::Char('q') | KeyCode::Esc => Some(UiCommand::Quit),
            KeyCode::Left | KeyCode::Char('h') => Some(UiCommand::CursorLeft),
            KeyCode::Right | KeyCode::Char('l') => Some(UiCommand::CursorRight),
            KeyCode::Enter | KeyCode::Char(' ') => Some(UiCommand::Select),
            KeyCode::Char(c) => {
                let column = c.to_digit(10)? as usize;
                (1..=board.width)
                    .contains(&column)
                    .then(|| UiCommand::Click(Interaction::on_column(column - 1)))
            }
            _ => None,
        },
        Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            Some(UiCommand::Click(Interaction {
                column: column_at(board, mouse.column, mouse.row).map(|c| c.to_string()),
            }))
        }
        _ => None,
    }
}

/// Reads terminal input on a blocking thread and feeds the session queue
/// in the order the user produced it. Ends when the queue is dropped.
pub fn spawn_input_task(
    events: mpsc::Sender<SessionEvent>,
    board: Board,
) -> JoinHandle<std::io::Result<()>> {
    tokio::task::spawn_blocking(move || {
        while !events.is_closed() {
            if !event::poll(Duration::from_millis(100))? {
                continue;
            }
            let input = event::read()?;
            if let Some(command) = translate(&input, &board) {
                if events.blocking_send(SessionEvent::Ui(command)).is_err() {
                    break;
                }
            }
        }
        Ok(())
    })
}
