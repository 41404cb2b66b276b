//! 客户端错误类型

use thiserror::Error;

use crate::session::SessionPhase;
use protocol::ProtocolError;

/// 会话错误
///
/// 这里没有任何对进程致命的错误：本地拒绝或者降级为终止阶段，
/// 外加一条用户可见提示。
#[derive(Error, Debug)]
pub enum SessionError {
    /// 意图在当前会话阶段不被允许：本地拒绝，不发送任何帧
    #[error("Intent {intent:?} rejected in phase {phase:?}")]
    PhaseViolation {
        intent: &'static str,
        phase: SessionPhase,
    },

    /// 登录信息无效
    #[error("Invalid login: {reason}")]
    InvalidLogin { reason: String },

    /// 连接已不存在（句柄已关闭或发送任务退出）
    #[error("Not connected")]
    NotConnected,

    /// 传输层错误
    #[error(transparent)]
    Transport(#[from] ProtocolError),
}
