use super::types::{PlayerId, Position};
use thiserror::Error;

pub const DEFAULT_COLUMNS: usize = 7;
pub const DEFAULT_ROWS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cell ({column}, {row}) is outside the {columns}x{rows} board")]
    OutOfRange {
        column: i64,
        row: i64,
        columns: usize,
        rows: usize,
    },
    #[error("cell {0} is already occupied")]
    Occupied(Position),
}

/// 盤面。サーバーから届いた play イベントだけで更新される
#[derive(Debug, Clone)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    /// cells[column][row]
    cells: Vec<Vec<Option<PlayerId>>>,
    pub last_move: Option<Position>,
}

impl Default for Board {
    fn default() -> Self {
        Board::new(DEFAULT_COLUMNS, DEFAULT_ROWS)
    }
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Board {
            width,
            height,
            cells: vec![vec![None; height]; width],
            last_move: None,
        }
    }

    pub fn get(&self, pos: Position) -> Option<&PlayerId> {
        self.cells
            .get(pos.column)
            .and_then(|col| col.get(pos.row))
            .and_then(|cell| cell.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(|cell| cell.is_none())
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.is_some()).count()
    }

    /// 指定セルにマーカーを置く。範囲外や既に埋まっているセルはエラー
    pub fn play_move(&mut self, player: PlayerId, column: i64, row: i64) -> Result<(), BoardError> {
        let pos = self.position(column, row).ok_or(BoardError::OutOfRange {
            column,
            row,
            columns: self.width,
            rows: self.height,
        })?;

        let cell = &mut self.cells[pos.column][pos.row];
        if cell.is_some() {
            return Err(BoardError::Occupied(pos));
        }
        *cell = Some(player);
        self.last_move = Some(pos);
        Ok(())
    }

    fn position(&self, column: i64, row: i64) -> Option<Position> {
        let column = usize::try_from(column).ok()?;
        let row = usize::try_from(row).ok()?;
        (column < self.width && row < self.height).then(|| Position::new(column, row))
    }
}
