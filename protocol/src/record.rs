//! 走法记录
//!
//! 记录只由服务端消息构造，客户端从不自行合成。

use serde::{Deserialize, Serialize};

use crate::piece::Piece;
use crate::square::Square;

/// 走法附加动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveAction {
    /// 吃子
    Capturing,
    /// 升变
    Promotion,
    /// 将军
    Check,
    /// 王车易位
    Castling,
}

/// 走法记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 起始格
    pub from: Square,
    /// 目标格
    pub to: Square,
    /// 走动的棋子
    pub piece: Piece,
    /// 附加动作集合
    #[serde(default)]
    pub actions: Vec<MoveAction>,
}

impl MoveRecord {
    /// 创建新的走法记录
    pub fn new(from: Square, to: Square, piece: Piece) -> Self {
        Self {
            from,
            to,
            piece,
            actions: Vec::new(),
        }
    }

    /// 带动作创建
    pub fn with_actions(from: Square, to: Square, piece: Piece, actions: Vec<MoveAction>) -> Self {
        Self {
            from,
            to,
            piece,
            actions,
        }
    }

    /// 是否包含指定动作
    pub fn has(&self, action: MoveAction) -> bool {
        self.actions.contains(&action)
    }
}

/// 整回合行：白方走法 + 可选的黑方走法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRow<'a> {
    /// 回合编号，从 1 开始
    pub number: usize,
    pub white: &'a MoveRecord,
    pub black: Option<&'a MoveRecord>,
}

/// 棋谱：只增不减，随入站对局状态单调增长
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveHistory {
    moves: Vec<MoveRecord>,
}

impl MoveHistory {
    /// 创建空棋谱
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条记录
    pub fn push(&mut self, record: MoveRecord) {
        self.moves.push(record);
    }

    /// 所有记录
    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    /// 总步数
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// 按整回合分组（用于棋谱展示）
    ///
    /// 奇数长度时当前行的黑方槽位留空。
    pub fn rows(&self) -> Vec<MoveRow<'_>> {
        self.moves
            .chunks(2)
            .enumerate()
            .map(|(i, pair)| MoveRow {
                number: i + 1,
                white: &pair[0],
                black: pair.get(1),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Color, PieceKind};

    fn record(from: &str, to: &str) -> MoveRecord {
        MoveRecord::new(
            from.parse().unwrap(),
            to.parse().unwrap(),
            Piece::new(PieceKind::Pawn, Color::White),
        )
    }

    #[test]
    fn test_record_serde() {
        let json = r#"{"from":"e4","to":"d5","piece":"P-w","actions":["capturing"]}"#;
        let decoded: MoveRecord = serde_json::from_str(json).unwrap();

        assert_eq!(decoded.from.to_string(), "e4");
        assert_eq!(decoded.to.to_string(), "d5");
        assert_eq!(decoded.piece, Piece::new(PieceKind::Pawn, Color::White));
        assert!(decoded.has(MoveAction::Capturing));
        assert!(!decoded.has(MoveAction::Check));
    }

    #[test]
    fn test_record_actions_default_empty() {
        // 服务端可以省略 actions 字段
        let json = r#"{"from":"e2","to":"e4","piece":"P-w"}"#;
        let decoded: MoveRecord = serde_json::from_str(json).unwrap();
        assert!(decoded.actions.is_empty());
    }

    #[test]
    fn test_rows_pairing() {
        let mut history = MoveHistory::new();
        history.push(record("e2", "e4"));
        history.push(record("e7", "e5"));
        history.push(record("g1", "f3"));

        let rows = history.rows();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].number, 1);
        assert_eq!(rows[0].white.to.to_string(), "e4");
        assert_eq!(rows[0].black.unwrap().to.to_string(), "e5");

        // 奇数长度：最后一行黑方留空
        assert_eq!(rows[1].number, 2);
        assert_eq!(rows[1].white.to.to_string(), "f3");
        assert!(rows[1].black.is_none());
    }

    #[test]
    fn test_empty_history() {
        let history = MoveHistory::new();
        assert!(history.is_empty());
        assert!(history.rows().is_empty());
    }
}
