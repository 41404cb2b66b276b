//! 棋盘快照

use serde::de::Error as _;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::BOARD_SIZE;
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;

/// 棋盘快照
///
/// 8x8 网格，行优先，第 0 行是第 8 横排（服务端规范朝向）。
/// 每次收到对局状态都整体替换，不做增量修改。
/// 线路形式为 8 个长度为 8 的数组，元素是棋子编码或 null。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    /// 64 格，索引为 row * 8 + col
    squares: Vec<Option<Piece>>,
}

impl BoardSnapshot {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: vec![None; BOARD_SIZE * BOARD_SIZE],
        }
    }

    /// 创建初始棋盘（标准开局摆法）
    pub fn initial() -> Self {
        use PieceKind::*;

        let mut board = Self::empty();
        let back_rank = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        for (file, kind) in back_rank.into_iter().enumerate() {
            let file = file as u8;
            board.set(Square::new_unchecked(file, 7), Some(Piece::new(kind, Color::Black)));
            board.set(Square::new_unchecked(file, 6), Some(Piece::new(Pawn, Color::Black)));
            board.set(Square::new_unchecked(file, 1), Some(Piece::new(Pawn, Color::White)));
            board.set(Square::new_unchecked(file, 0), Some(Piece::new(kind, Color::White)));
        }

        board
    }

    /// 获取指定格子的棋子
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.squares[Self::index_of(square)]
    }

    /// 设置指定格子的棋子
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[Self::index_of(square)] = piece;
    }

    /// 按存储顺序迭代各行（第 0 行 = 第 8 横排）
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Piece>]> {
        self.squares.chunks(BOARD_SIZE)
    }

    fn index_of(square: Square) -> usize {
        (BOARD_SIZE - 1 - square.rank() as usize) * BOARD_SIZE + square.file() as usize
    }
}

impl Serialize for BoardSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(BOARD_SIZE))?;
        for row in self.rows() {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for BoardSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows: Vec<Vec<Option<Piece>>> = Vec::deserialize(deserializer)?;
        if rows.len() != BOARD_SIZE {
            return Err(D::Error::invalid_length(rows.len(), &"8 rows"));
        }
        let mut squares = Vec::with_capacity(BOARD_SIZE * BOARD_SIZE);
        for row in &rows {
            if row.len() != BOARD_SIZE {
                return Err(D::Error::invalid_length(row.len(), &"8 columns"));
            }
            squares.extend(row.iter().copied());
        }
        Ok(Self { squares })
    }
}
