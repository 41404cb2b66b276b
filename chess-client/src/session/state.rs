//! 会话状态与转移表

use protocol::{
    BoardSnapshot, ClientMessage, GameInfo, MoveHistory, ServerMessage, MAX_USERNAME_LEN,
};

use crate::error::SessionError;
use crate::session::{DrawOffer, Intent, Notice, SessionPhase};

/// 会话快照：交给展示层的不可变视图
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    /// 服务端是否仍在等待对手加入
    pub waiting_for_opponent: bool,
    pub board: Option<BoardSnapshot>,
    pub game_info: Option<GameInfo>,
    pub history: MoveHistory,
    pub draw_offer: DrawOffer,
    /// 最近一条用户可见提示
    pub notice: Option<Notice>,
}

/// 客户端会话状态机
///
/// 一次只处理一个事件（入站消息或用户意图），转移完成后才处理下一个。
/// 棋盘快照收到 `game_state` 即整体替换，避免漏消息后的增量漂移。
#[derive(Debug, Default)]
pub struct Session {
    phase: SessionPhase,
    waiting_for_opponent: bool,
    board: Option<BoardSnapshot>,
    game_info: Option<GameInfo>,
    history: MoveHistory,
    draw_offer: DrawOffer,
    notice: Option<Notice>,
}

impl Session {
    /// 创建新会话
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前会话阶段
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// 生成当前快照
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            waiting_for_opponent: self.waiting_for_opponent,
            board: self.board.clone(),
            game_info: self.game_info.clone(),
            history: self.history.clone(),
            draw_offer: self.draw_offer,
            notice: self.notice.clone(),
        }
    }

    /// 提交用户意图
    ///
    /// 通过校验则返回待发送的线路消息；阶段不符本地拒绝，
    /// 省掉一次服务端必然驳回的往返。
    pub fn submit(&mut self, intent: Intent) -> Result<ClientMessage, SessionError> {
        let name = intent.name();
        match intent {
            Intent::Login { game_id, username } => {
                self.guard(name, self.phase == SessionPhase::Unauthenticated)?;
                validate_login(&game_id, &username)?;
                Ok(ClientMessage::Login { game_id, username })
            }
            Intent::Move { from, to } => {
                self.guard(name, self.phase == SessionPhase::ActiveGame)?;
                Ok(ClientMessage::Move { from, to })
            }
            Intent::OfferDraw => {
                // 己方已有未决提议时不允许再提
                self.guard(
                    name,
                    self.phase == SessionPhase::ActiveGame && self.draw_offer != DrawOffer::Offered,
                )?;
                self.draw_offer = DrawOffer::Offered;
                Ok(ClientMessage::OfferDraw)
            }
            Intent::AcceptDraw => {
                self.guard(
                    name,
                    self.phase == SessionPhase::ActiveGame && self.draw_offer == DrawOffer::Received,
                )?;
                self.draw_offer = DrawOffer::None;
                Ok(ClientMessage::AcceptDraw)
            }
            Intent::RejectDraw => {
                self.guard(
                    name,
                    self.phase == SessionPhase::ActiveGame && self.draw_offer == DrawOffer::Received,
                )?;
                self.draw_offer = DrawOffer::None;
                Ok(ClientMessage::RejectDraw)
            }
            Intent::Resign => {
                self.guard(name, self.phase == SessionPhase::ActiveGame)?;
                Ok(ClientMessage::Resign)
            }
            Intent::Ping => {
                // 即发即忘，等待和对局中都可用
                self.guard(
                    name,
                    matches!(
                        self.phase,
                        SessionPhase::AwaitingOpponent | SessionPhase::ActiveGame
                    ),
                )?;
                Ok(ClientMessage::Ping)
            }
        }
    }

    /// 应用一条服务端消息，返回需要自动回发的消息
    pub fn apply(&mut self, msg: ServerMessage) -> Vec<ClientMessage> {
        let mut outbound = Vec::new();

        match msg {
            ServerMessage::LoginSuccess => {
                if self.phase == SessionPhase::Unauthenticated {
                    self.phase = if self.waiting_for_opponent {
                        SessionPhase::AwaitingOpponent
                    } else {
                        SessionPhase::ActiveGame
                    };
                    tracing::info!("Login success, phase: {:?}", self.phase);
                }
            }
            ServerMessage::WaitingForOpponent => {
                self.waiting_for_opponent = true;
                if self.phase == SessionPhase::Unauthenticated {
                    self.phase = SessionPhase::AwaitingOpponent;
                }
            }
            ServerMessage::OppLoginSuccess => {
                // 只清等待标志，不代表本地登录状态变化
                self.waiting_for_opponent = false;
                if self.phase == SessionPhase::AwaitingOpponent {
                    self.phase = SessionPhase::ActiveGame;
                }
            }
            ServerMessage::GameInfo { data } => {
                // 每局只接受一次；可能先于或晚于首个棋盘快照到达
                if self.game_info.is_none() {
                    tracing::info!(
                        "Game info: {} vs {}",
                        data.username,
                        data.opponent_username
                    );
                    self.game_info = Some(data);
                } else {
                    tracing::debug!("Duplicate game_info ignored");
                }
            }
            ServerMessage::GameState {
                state,
                last_move,
                game_over,
            } => {
                self.board = Some(state);
                if let Some(record) = last_move {
                    self.history.push(record);
                }
                self.waiting_for_opponent = false;
                if self.phase == SessionPhase::AwaitingOpponent {
                    self.phase = SessionPhase::ActiveGame;
                }

                // 一步棋到来即废止悬挂的和棋提议：
                // 收到的提议要替用户自动回拒，己方的提议静默清除
                match self.draw_offer {
                    DrawOffer::Received => {
                        self.draw_offer = DrawOffer::None;
                        outbound.push(ClientMessage::RejectDraw);
                    }
                    DrawOffer::Offered => {
                        self.draw_offer = DrawOffer::None;
                    }
                    DrawOffer::None => {}
                }

                // 终局标志：不透明文案，转发不解读
                if let Some(text) = game_over {
                    self.phase = SessionPhase::Terminated;
                    self.notice = Some(Notice::info(text));
                }
            }
            ServerMessage::DrawOfferReceived => {
                self.draw_offer = DrawOffer::Received;
            }
            ServerMessage::DrawRejected => {
                if self.draw_offer == DrawOffer::Offered {
                    self.draw_offer = DrawOffer::None;
                }
                self.notice = Some(Notice::info("Draw rejected."));
            }
            ServerMessage::Error { content } => {
                // 原样示意，不改变阶段
                self.notice = Some(Notice::error(content));
            }
        }

        outbound
    }

    /// 连接断开：无条件进入终止阶段
    pub fn handle_disconnect(&mut self, reason: impl Into<String>) {
        if self.phase != SessionPhase::Terminated {
            self.phase = SessionPhase::Terminated;
            self.notice = Some(Notice::error(reason));
        }
    }

    /// 整个会话重置：离开终止阶段的唯一途径
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn guard(&self, intent: &'static str, allowed: bool) -> Result<(), SessionError> {
        if allowed {
            Ok(())
        } else {
            Err(SessionError::PhaseViolation {
                intent,
                phase: self.phase,
            })
        }
    }
}

fn validate_login(game_id: &str, username: &str) -> Result<(), SessionError> {
    if game_id.trim().is_empty() {
        return Err(SessionError::InvalidLogin {
            reason: "game id is empty".to_string(),
        });
    }
    if username.trim().is_empty() {
        return Err(SessionError::InvalidLogin {
            reason: "username is empty".to_string(),
        });
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(SessionError::InvalidLogin {
            reason: format!("username too long (max {} chars)", MAX_USERNAME_LEN),
        });
    }
    Ok(())
}
