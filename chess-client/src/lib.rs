//! 国际象棋联机对战客户端
//!
//! 客户端核心是会话状态机与连接运行时：棋规引擎运行在远端服务器，
//! 本地从不复核走法合法性；展示层只订阅快照、提交意图。

pub mod error;
pub mod network;
pub mod session;
pub mod settings;

pub use error::SessionError;
pub use network::SessionHandle;
pub use session::{
    DrawOffer, Intent, Notice, NoticeLevel, Session, SessionPhase, SessionSnapshot,
};
pub use settings::ClientSettings;
