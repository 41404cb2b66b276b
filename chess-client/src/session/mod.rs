//! 会话状态机模块
//!
//! 客户端的权威状态都在这里：会话阶段、棋盘快照、对局信息、
//! 棋谱与和棋提议。展示层只消费快照，规则只写在转移表里。

mod state;

pub use state::{Session, SessionSnapshot};

use protocol::Square;

/// 会话阶段
///
/// 登录 → 等待对手（可选）→ 对局中 → 终止。任意时刻恰好一个值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// 未登录（初始）：只允许 login 意图
    #[default]
    Unauthenticated,
    /// 已登录但服务端尚未配对到对手
    AwaitingOpponent,
    /// 对局进行中
    ActiveGame,
    /// 会话终止：认输确认、终局标志或连接断开
    Terminated,
}

/// 和棋提议的悬挂状态
///
/// 每方同时至多一个未决提议，正交于会话阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawOffer {
    /// 无未决提议
    #[default]
    None,
    /// 己方已提和，等待对方答复
    Offered,
    /// 收到对方提和，等待本地决定
    Received,
}

/// 用户意图：客户端想发给服务端的动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// 登录指定对局
    Login { game_id: String, username: String },
    /// 走棋
    Move { from: Square, to: Square },
    /// 提和
    OfferDraw,
    /// 接受和棋
    AcceptDraw,
    /// 拒绝和棋
    RejectDraw,
    /// 认输
    Resign,
    /// 催促对手
    Ping,
}

impl Intent {
    /// 意图名称（用于拒绝报告与日志）
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Login { .. } => "login",
            Intent::Move { .. } => "move",
            Intent::OfferDraw => "offer_draw",
            Intent::AcceptDraw => "accept_draw",
            Intent::RejectDraw => "reject_draw",
            Intent::Resign => "resign",
            Intent::Ping => "ping",
        }
    }
}

/// 提示级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// 用户可见提示
///
/// 只决定"要展示什么"，不决定"怎么展示"；不改变会话阶段。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    /// 普通提示
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    /// 错误提示
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}
