//! 代数记谱渲染
//!
//! 把走法记录转换为展示符号：Unicode 棋子字符 + 类代数文本。
//! 注释按固定顺序叠加：目标格 → 吃子 → 升变 → 将军 → 易位。

use crate::record::{MoveAction, MoveRecord};

/// 展示符号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayToken {
    /// 棋子字符（兵为空串）
    pub glyph: &'static str,
    /// 类代数文本，如 `exd5`、`O-O`
    pub text: String,
}

/// 记谱渲染器
pub struct Notation;

impl Notation {
    /// 渲染一条走法记录
    pub fn render(record: &MoveRecord) -> DisplayToken {
        let mut text = record.to.to_string();

        if record.has(MoveAction::Capturing) {
            // 兵吃子需加起始纵线消歧义
            text = format!("x{}", text);
            if record.piece.kind == crate::piece::PieceKind::Pawn {
                text = format!("{}{}", record.from.file_char(), text);
            }
        }

        if record.has(MoveAction::Promotion) {
            // 固定占位符：真正升变成什么由服务端裁定，这里只做展示
            text.push_str("=H");
        }

        if record.has(MoveAction::Check) {
            text.push('+');
        }

        if record.has(MoveAction::Castling) {
            // 易位覆盖其它一切注释：王的走法不可能同时吃子或升变
            let to = record.to.to_string();
            text = if to == "g1" || to == "g8" {
                "O-O".to_string()
            } else {
                "O-O-O".to_string()
            };
        }

        DisplayToken {
            glyph: record.piece.glyph(),
            text,
        }
    }
}
