//! 协议常量定义

use std::time::Duration;

/// 棋盘边长（行数 = 列数 = 8）
pub const BOARD_SIZE: usize = 8;

/// 用户名最大长度
pub const MAX_USERNAME_LEN: usize = 20;

/// 消息帧最大大小
pub const MAX_FRAME_SIZE: usize = 65536;

/// 默认服务器端口
pub const DEFAULT_PORT: u16 = 5050;

/// 连接超时（秒）
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// 连接超时 Duration
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(CONNECT_TIMEOUT_SECS);
