//! 代数坐标与棋盘索引映射
//!
//! 本地棋盘始终按存储顺序自上而下绘制，视角翻转只发生在
//! 索引 ↔ 坐标的换算里：
//! - 白方视角：第 0 行是第 8 横排，第 0 列是 a 纵线
//! - 黑方视角：整盘旋转 180°，第 0 行是第 1 横排，第 0 列是 h 纵线

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::BOARD_SIZE;
use crate::error::ChessError;

/// 棋盘格子坐标
///
/// 规范文本形式恰好两个字符：纵线字母 `a`-`h` + 横排数字 `1`-`8`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    /// 纵线 (0 = a, 7 = h)
    file: u8,
    /// 横排 (0 = 第 1 排, 7 = 第 8 排)
    rank: u8,
}

impl Square {
    /// 创建新坐标
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if (file as usize) < BOARD_SIZE && (rank as usize) < BOARD_SIZE {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    /// 创建新坐标（不检查边界，内部使用）
    pub const fn new_unchecked(file: u8, rank: u8) -> Self {
        Self { file, rank }
    }

    /// 纵线索引 (0 = a)
    pub fn file(&self) -> u8 {
        self.file
    }

    /// 横排索引 (0 = 第 1 排)
    pub fn rank(&self) -> u8 {
        self.rank
    }

    /// 纵线字母
    pub fn file_char(&self) -> char {
        (b'a' + self.file) as char
    }

    /// 横排数字
    pub fn rank_char(&self) -> char {
        (b'1' + self.rank) as char
    }

    /// 从网格索引换算坐标
    ///
    /// 纯函数：同样输入永远得到同样输出，渲染和点击每次都会调用。
    pub fn from_indices(row: usize, col: usize, white_pov: bool) -> Result<Self, ChessError> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(ChessError::InvalidIndex { row, col });
        }
        let (file, rank) = if white_pov {
            (col as u8, (BOARD_SIZE - 1 - row) as u8)
        } else {
            ((BOARD_SIZE - 1 - col) as u8, row as u8)
        };
        Ok(Self { file, rank })
    }

    /// 换算回网格索引（`from_indices` 的逆运算）
    pub fn to_indices(&self, white_pov: bool) -> (usize, usize) {
        if white_pov {
            (BOARD_SIZE - 1 - self.rank as usize, self.file as usize)
        } else {
            (self.rank as usize, BOARD_SIZE - 1 - self.file as usize)
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ChessError::InvalidSquare {
            input: s.to_string(),
        };

        let mut chars = s.chars();
        let file = chars.next().ok_or_else(invalid)?;
        let rank = chars.next().ok_or_else(invalid)?;
        if chars.next().is_some() || !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return Err(invalid());
        }
        Ok(Self {
            file: file as u8 - b'a',
            rank: rank as u8 - b'1',
        })
    }
}

impl Serialize for Square {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_corners() {
        // 白方视角：左上角是 a8
        assert_eq!(
            Square::from_indices(0, 0, true).unwrap().to_string(),
            "a8"
        );
        // 黑方视角：左上角是 h1
        assert_eq!(
            Square::from_indices(0, 0, false).unwrap().to_string(),
            "h1"
        );
        assert_eq!(
            Square::from_indices(7, 7, true).unwrap().to_string(),
            "h1"
        );
        assert_eq!(
            Square::from_indices(7, 7, false).unwrap().to_string(),
            "a8"
        );
    }

    #[test]
    fn test_indices_roundtrip() {
        for white_pov in [true, false] {
            for row in 0..8 {
                for col in 0..8 {
                    let square = Square::from_indices(row, col, white_pov).unwrap();
                    assert_eq!(square.to_indices(white_pov), (row, col));
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_indices() {
        assert_eq!(
            Square::from_indices(8, 0, true),
            Err(ChessError::InvalidIndex { row: 8, col: 0 })
        );
        assert_eq!(
            Square::from_indices(0, 9, false),
            Err(ChessError::InvalidIndex { row: 0, col: 9 })
        );
    }

    #[test]
    fn test_parse_and_display() {
        let square: Square = "e4".parse().unwrap();
        assert_eq!(square.file_char(), 'e');
        assert_eq!(square.rank_char(), '4');
        assert_eq!(square.to_string(), "e4");

        assert!("i4".parse::<Square>().is_err());
        assert!("e9".parse::<Square>().is_err());
        assert!("e".parse::<Square>().is_err());
        assert!("e44".parse::<Square>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let square = Square::new(4, 3).unwrap();
        assert_eq!(serde_json::to_string(&square).unwrap(), "\"e4\"");

        let decoded: Square = serde_json::from_str("\"h8\"").unwrap();
        assert_eq!(decoded, Square::new(7, 7).unwrap());
    }
}
