//! 棋子定义

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ChessError;

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    /// 兵
    Pawn,
    /// 马
    Knight,
    /// 象
    Bishop,
    /// 车
    Rook,
    /// 后
    Queen,
    /// 王
    King,
}

impl PieceKind {
    /// 获取英文缩写字母（线路编码用）
    pub fn letter(&self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// 从缩写字母解析
    pub fn from_letter(c: char) -> Option<PieceKind> {
        match c {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// 白方（先手，视角在下方）
    White,
    /// 黑方（后手，视角旋转 180°）
    Black,
}

impl Color {
    /// 获取对方阵营
    pub fn opponent(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// 获取线路编码字母
    pub fn letter(&self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    /// 从线路编码字母解析
    pub fn from_letter(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }
}

/// 棋子
///
/// 线路编码为 `"<类型字母>-<阵营字母>"`，如白兵 `P-w`、黑马 `N-b`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    /// 创建新棋子
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    /// 获取棋子显示的 Unicode 字符（兵无字符，符合代数记谱惯例）
    pub fn glyph(&self) -> &'static str {
        match (self.kind, self.color) {
            (PieceKind::Pawn, _) => "",
            (PieceKind::Knight, Color::White) => "♘",
            (PieceKind::Bishop, Color::White) => "♗",
            (PieceKind::Rook, Color::White) => "♖",
            (PieceKind::Queen, Color::White) => "♕",
            (PieceKind::King, Color::White) => "♔",
            (PieceKind::Knight, Color::Black) => "♞",
            (PieceKind::Bishop, Color::Black) => "♝",
            (PieceKind::Rook, Color::Black) => "♜",
            (PieceKind::Queen, Color::Black) => "♛",
            (PieceKind::King, Color::Black) => "♚",
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.letter(), self.color.letter())
    }
}

impl FromStr for Piece {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ChessError::InvalidPiece {
            input: s.to_string(),
        };

        let mut chars = s.chars();
        let kind = chars.next().and_then(PieceKind::from_letter);
        let dash = chars.next();
        let color = chars.next().and_then(Color::from_letter);
        if chars.next().is_some() || dash != Some('-') {
            return Err(invalid());
        }
        match (kind, color) {
            (Some(kind), Some(color)) => Ok(Piece { kind, color }),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for Piece {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(D::Error::custom)
    }
}
