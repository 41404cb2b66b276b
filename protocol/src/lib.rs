//! 国际象棋联机对战共享协议库
//!
//! 包含:
//! - 格子坐标、棋子、棋盘快照等核心数据结构
//! - 视角相关的索引 ↔ 代数坐标换算
//! - 走法记录与代数记谱渲染
//! - 消息类型定义 (ClientMessage, ServerMessage)
//! - 传输层抽象 (Connector, Connection, Listener traits)
//! - 换行分帧的 JSON 文本编解码

mod board;
mod constants;
mod error;
mod message;
mod notation;
mod piece;
mod record;
mod square;
mod transport;

pub use board::BoardSnapshot;
pub use constants::*;
pub use error::{ChessError, ProtocolError, Result};
pub use message::{ClientMessage, GameInfo, ServerMessage};
pub use notation::{DisplayToken, Notation};
pub use piece::{Color, Piece, PieceKind};
pub use record::{MoveAction, MoveHistory, MoveRecord, MoveRow};
pub use square::Square;
pub use transport::{
    Connection, Connector, FrameReader, FrameWriter, Listener, TcpConnection, TcpConnector,
    TcpListener,
};
