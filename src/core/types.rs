use serde::{Deserialize, Serialize};
use std::fmt;

/// プレイヤーID (サーバーが決める文字列。通常は "red" / "yellow")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        PlayerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        PlayerId::new(id)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 盤面座標 (column, row)。row 0 が最下段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub column: usize,
    pub row: usize,
}

impl Position {
    pub fn new(column: usize, row: usize) -> Self {
        Position { column, row }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_id_is_a_bare_string_on_the_wire() {
        let id = PlayerId::from("red");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"red\"");
        let back: PlayerId = serde_json::from_str("\"yellow\"").unwrap();
        assert_eq!(back.as_str(), "yellow");
        assert_eq!(back.to_string(), "yellow");
    }
}
