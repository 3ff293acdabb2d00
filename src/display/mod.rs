use crate::core::{Board, BoardError, PlayerId, Position};
use crate::session::effects::{
    BoardSurface, ConnectionState, Interaction, LinkAffordances, Notice, NoticeKind, Notifier,
    SessionView,
};
use crate::session::role::{share_link, RoleContext, JOIN_PARAM, WATCH_PARAM};
use crossterm::{cursor, queue, style::Stylize, terminal};
use std::collections::VecDeque;
use std::io::{stdout, Write};

/// 盤面の左上 (セル (0, 最上段) の位置)
pub const BOARD_LEFT: u16 = 4;
pub const BOARD_TOP: u16 = 7;
pub const CELL_WIDTH: u16 = 4;

/// Terminal coordinates to the column tag of the cell under them.
/// Anything outside the grid carries no tag.
pub fn column_at(board: &Board, x: u16, y: u16) -> Option<usize> {
    if x < BOARD_LEFT || y < BOARD_TOP {
        return None;
    }
    let column = ((x - BOARD_LEFT) / CELL_WIDTH) as usize;
    let row = (y - BOARD_TOP) as usize;
    (column < board.width && row < board.height).then_some(column)
}

/// 画面の状態。ターミナルへの描画は refresh() でのみ行う
pub struct TerminalView {
    pub board: Board,
    pub role: RoleContext,
    pub cursor: usize,
    pub state: ConnectionState,
    pub share_base: String,
    pub join_link: Option<String>,
    pub watch_link: Option<String>,
    /// 表示待ちの通知。先頭だけを表示し、閉じると次が出る
    pub notices: VecDeque<Notice>,
}

impl TerminalView {
    pub fn new(board: Board, role: RoleContext, share_base: &str) -> Self {
        Self {
            board,
            role,
            cursor: 0,
            state: ConnectionState::Connecting,
            share_base: share_base.to_string(),
            join_link: None,
            watch_link: None,
            notices: VecDeque::new(),
        }
    }

    fn spectating(&self) -> bool {
        self.role.is_spectator()
    }

    fn status_line(&self) -> String {
        let state = match self.state {
            ConnectionState::Connecting => "connecting...",
            ConnectionState::Open => "connected",
            ConnectionState::Closed => "disconnected",
            ConnectionState::Errored => "connection error",
        };
        format!(
            "{} | {} | {} moves",
            self.role.label(),
            state,
            self.board.occupied()
        )
    }

    fn render(&self, out: &mut impl Write) -> std::io::Result<()> {
        queue!(
            out,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        )?;

        write!(out, "=== Connect Four ===\r\n")?;
        let status = self.status_line();
        if self.state.is_terminal() {
            write!(out, "{}\r\n", status.bold().red())?;
        } else {
            write!(out, "{}\r\n", status.bold().yellow())?;
        }
        match &self.join_link {
            Some(link) => write!(out, "Join:  {}\r\n", link.clone().cyan())?,
            None => write!(out, "\r\n")?,
        }
        match &self.watch_link {
            Some(link) => write!(out, "Watch: {}\r\n", link.clone().cyan())?,
            None => write!(out, "\r\n")?,
        }
        write!(out, "\r\n")?;

        // 列ラベル (カーソル列を強調)
        write!(out, "    ")?;
        for column in 0..self.board.width {
            let label = format!(" {}  ", column + 1);
            if !self.spectating() && column == self.cursor {
                write!(out, "{}", label.black().on_yellow())?;
            } else {
                write!(out, "{}", label)?;
            }
        }
        write!(out, "\r\n")?;
        write!(out, "   +{}+\r\n", "-".repeat(self.board.width * CELL_WIDTH as usize))?;

        for y in (0..self.board.height).rev() {
            write!(out, "   |")?;
            for x in 0..self.board.width {
                let pos = Position::new(x, y);
                let is_last = self.board.last_move == Some(pos);
                let text = match self.board.get(pos) {
                    Some(player) => {
                        let (prefix, suffix) = if is_last { ("(", ")") } else { (" ", " ") };
                        let cell = format!("{}{}{} ", prefix, marker(player), suffix);
                        match player.as_str() {
                            "red" => cell.red().to_string(),
                            "yellow" => cell.yellow().to_string(),
                            _ => cell.cyan().to_string(),
                        }
                    }
                    None => " .  ".to_string(),
                };
                write!(out, "{}", text)?;
            }
            write!(out, "|\r\n")?;
        }
        write!(out, "   +{}+\r\n", "-".repeat(self.board.width * CELL_WIDTH as usize))?;

        if self.spectating() {
            write!(out, "[q]: Quit (spectating)\r\n")?;
        } else {
            write!(
                out,
                "[Arrows]: Column | [Enter]/[1-{}]/Click: Drop | [q]: Quit\r\n",
                self.board.width
            )?;
        }

        if let Some(notice) = self.notices.front() {
            let stamp = notice.raised_at.format("%H:%M:%S");
            let text = format!(" {} [{}] ", notice.text, stamp);
            write!(out, "\r\n")?;
            match notice.kind {
                NoticeKind::Win => write!(out, "{}\r\n", text.black().on_green())?,
                NoticeKind::Error => write!(out, "{}\r\n", text.white().on_red())?,
            }
            if self.notices.len() > 1 {
                write!(
                    out,
                    "(press Enter to dismiss, {} more)\r\n",
                    self.notices.len() - 1
                )?;
            } else {
                write!(out, "(press Enter to dismiss)\r\n")?;
            }
        }

        out.flush()
    }
}

fn marker(player: &PlayerId) -> char {
    player
        .as_str()
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('?')
}

impl BoardSurface for TerminalView {
    fn play_move(&mut self, player: PlayerId, column: i64, row: i64) -> Result<(), BoardError> {
        self.board.play_move(player, column, row)
    }
}

impl LinkAffordances for TerminalView {
    fn set_join_link(&mut self, code: &str) {
        self.join_link = Some(share_link(&self.share_base, JOIN_PARAM, code));
    }

    fn set_watch_link(&mut self, code: &str) {
        self.watch_link = Some(share_link(&self.share_base, WATCH_PARAM, code));
    }
}

impl Notifier for TerminalView {
    fn show_notice(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }
}

impl SessionView for TerminalView {
    fn set_connection_state(&mut self, state: ConnectionState) {
        self.state = state;
    }

    fn move_cursor(&mut self, delta: i32) {
        let max = self.board.width.saturating_sub(1) as i64;
        self.cursor = (self.cursor as i64 + delta as i64).clamp(0, max) as usize;
    }

    fn cursor_interaction(&self) -> Interaction {
        Interaction::on_column(self.cursor)
    }

    fn has_notice(&self) -> bool {
        !self.notices.is_empty()
    }

    fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    fn refresh(&mut self) -> std::io::Result<()> {
        self.render(&mut stdout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> TerminalView {
        TerminalView::new(Board::default(), RoleContext::NewGame, "")
    }

    #[test]
    fn hit_test_maps_cells_to_columns() {
        let board = Board::default();
        assert_eq!(column_at(&board, BOARD_LEFT, BOARD_TOP), Some(0));
        assert_eq!(column_at(&board, BOARD_LEFT + 3, BOARD_TOP + 5), Some(0));
        assert_eq!(column_at(&board, BOARD_LEFT + 4 * 3 + 1, BOARD_TOP + 2), Some(3));
        assert_eq!(column_at(&board, BOARD_LEFT + 4 * 6 + 3, BOARD_TOP), Some(6));
    }

    #[test]
    fn hit_test_outside_grid_has_no_tag() {
        let board = Board::default();
        assert_eq!(column_at(&board, 0, BOARD_TOP), None);
        assert_eq!(column_at(&board, BOARD_LEFT, 0), None);
        assert_eq!(column_at(&board, BOARD_LEFT + 4 * 7, BOARD_TOP), None);
        assert_eq!(column_at(&board, BOARD_LEFT, BOARD_TOP + 6), None);
    }

    #[test]
    fn cursor_is_clamped_to_board() {
        let mut view = view();
        view.move_cursor(-1);
        assert_eq!(view.cursor, 0);
        view.move_cursor(3);
        assert_eq!(view.cursor_interaction(), Interaction::on_column(3));
        view.move_cursor(10);
        assert_eq!(view.cursor, 6);
    }

    #[test]
    fn links_use_share_base() {
        let mut view = TerminalView::new(Board::default(), RoleContext::NewGame, "http://host/");
        view.set_join_link("abc");
        view.set_watch_link("xyz");
        assert_eq!(view.join_link.as_deref(), Some("http://host/?join=abc"));
        assert_eq!(view.watch_link.as_deref(), Some("http://host/?watch=xyz"));
    }

    fn rendered(view: &TerminalView) -> String {
        let mut out = Vec::new();
        view.render(&mut out).unwrap();
        String::from_utf8_lossy(&out).into_owned()
    }

    #[test]
    fn notices_queue_until_dismissed() {
        let mut view = view();
        view.show_notice(Notice::error("This slot is full."));
        view.show_notice(Notice::win(&"yellow".into()));

        let text = rendered(&view);
        assert!(text.contains("This slot is full."));
        assert!(!text.contains("Player yellow wins!"));
        assert!(text.contains("1 more"));

        view.dismiss_notice();
        assert!(view.has_notice());
        let text = rendered(&view);
        assert!(text.contains("Player yellow wins!"));
        assert!(!text.contains("This slot is full."));

        view.dismiss_notice();
        assert!(!view.has_notice());
        assert!(!rendered(&view).contains("dismiss"));
    }

    #[test]
    fn render_shows_board_links_and_notice() {
        let mut view = view();
        view.set_join_link("abc");
        view.play_move("red".into(), 0, 0).unwrap();
        view.show_notice(Notice::win(&"red".into()));

        let mut out = Vec::new();
        view.render(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);

        assert!(text.contains("?join=abc"));
        assert!(text.contains("(R)"));
        assert!(text.contains("Player red wins!"));
    }
}
