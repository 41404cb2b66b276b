//! 错误类型定义

use thiserror::Error;

/// 棋盘坐标错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// 无效的格子索引
    #[error("Invalid index: ({row}, {col})")]
    InvalidIndex { row: usize, col: usize },

    /// 无效的代数坐标
    #[error("Invalid square: {input:?}")]
    InvalidSquare { input: String },

    /// 无效的棋子编码
    #[error("Invalid piece code: {input:?}")]
    InvalidPiece { input: String },
}

/// 协议错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化错误（编码出站消息）
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 无法解析的入站帧（未知 type 或缺少字段）—— 丢弃，不致命
    #[error("Malformed message: {detail}")]
    Malformed { detail: String },

    /// 帧大小超限
    #[error("Frame too large: {size} bytes (max: {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// 连接超时
    #[error("Connection timeout")]
    ConnectionTimeout,

    /// 连接已关闭
    #[error("Connection closed")]
    ConnectionClosed,

    /// 坐标错误
    #[error("Chess error: {0}")]
    Chess(#[from] ChessError),
}

impl ProtocolError {
    /// 该错误是否终结连接
    ///
    /// 换行分帧保证坏帧之后流仍然对齐，Malformed 只需丢弃当前帧。
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ProtocolError::Malformed { .. })
    }
}

/// 协议操作结果类型
pub type Result<T> = std::result::Result<T, ProtocolError>;
