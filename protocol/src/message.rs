//! 消息类型定义
//!
//! 线路格式：不含换行的 JSON 文本帧，`type` 字符串字段作为标签。

use serde::{Deserialize, Serialize};

use crate::board::BoardSnapshot;
use crate::error::{ProtocolError, Result};
use crate::record::MoveRecord;
use crate::square::Square;

/// 对局信息
///
/// 每局只下发一次，收到后直到整个会话重置都不再变化。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameInfo {
    /// 本地玩家用户名
    pub username: String,
    /// 本地玩家是否执白
    pub is_white: bool,
    /// 对手用户名
    pub opponent_username: String,
    /// 本地玩家等级分（服务端可省略）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elo_rating: Option<f64>,
    /// 对手等级分（服务端可省略）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent_elo_rating: Option<f64>,
}

/// 客户端发送给服务端的消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// 登录指定对局
    #[serde(rename_all = "camelCase")]
    Login { game_id: String, username: String },
    /// 走棋（合法性由服务端裁定）
    Move { from: Square, to: Square },
    /// 提和
    OfferDraw,
    /// 接受和棋
    AcceptDraw,
    /// 拒绝和棋
    RejectDraw,
    /// 认输
    Resign,
    /// 催促对手（即发即忘，无应答约定）
    Ping,
}

/// 服务端发送给客户端的消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// 登录成功
    LoginSuccess,
    /// 对手登录成功
    OppLoginSuccess,
    /// 正在等待对手
    WaitingForOpponent,
    /// 对局信息
    GameInfo { data: GameInfo },
    /// 对局状态：整盘替换的棋盘快照
    GameState {
        state: BoardSnapshot,
        /// 服务端记录的最近一步（棋谱由此增长）
        #[serde(default, skip_serializing_if = "Option::is_none")]
        last_move: Option<MoveRecord>,
        /// 终局标志：不透明的结束文案，客户端只转发不解读
        #[serde(default, skip_serializing_if = "Option::is_none")]
        game_over: Option<String>,
    },
    /// 收到对方提和
    DrawOfferReceived,
    /// 己方提和被拒绝
    DrawRejected,
    /// 服务端错误，原样示意给用户
    Error { content: String },
}

impl ClientMessage {
    /// 编码为线路文本
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// 从线路文本解析
    pub fn decode(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ProtocolError::Malformed {
            detail: e.to_string(),
        })
    }
}

impl ServerMessage {
    /// 编码为线路文本
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// 从线路文本解析
    ///
    /// 未知 `type` 或缺少必需字段返回 [`ProtocolError::Malformed`]，
    /// 调用方记录日志后丢弃即可，不终结会话。
    pub fn decode(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ProtocolError::Malformed {
            detail: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_wire_form() {
        let msg = ClientMessage::Login {
            game_id: "42".to_string(),
            username: "alice".to_string(),
        };
        let value: serde_json::Value = serde_json::from_str(&msg.encode().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"type": "login", "gameId": "42", "username": "alice"})
        );
    }

    #[test]
    fn test_move_wire_form() {
        let msg = ClientMessage::Move {
            from: "e2".parse().unwrap(),
            to: "e4".parse().unwrap(),
        };
        let value: serde_json::Value = serde_json::from_str(&msg.encode().unwrap()).unwrap();
        assert_eq!(value, json!({"type": "move", "from": "e2", "to": "e4"}));
    }

    #[test]
    fn test_unit_intents_wire_form() {
        for (msg, tag) in [
            (ClientMessage::OfferDraw, "offer_draw"),
            (ClientMessage::AcceptDraw, "accept_draw"),
            (ClientMessage::RejectDraw, "reject_draw"),
            (ClientMessage::Resign, "resign"),
            (ClientMessage::Ping, "ping"),
        ] {
            let value: serde_json::Value = serde_json::from_str(&msg.encode().unwrap()).unwrap();
            assert_eq!(value, json!({"type": tag}));
        }
    }

    #[test]
    fn test_encode_is_newline_free() {
        let msg = ServerMessage::GameState {
            state: BoardSnapshot::initial(),
            last_move: None,
            game_over: None,
        };
        assert!(!msg.encode().unwrap().contains('\n'));
    }

    #[test]
    fn test_decode_game_info() {
        let text = r#"{"type":"game_info","data":{"username":"alice","is_white":true,"opponent_username":"bob"}}"#;
        let msg = ServerMessage::decode(text).unwrap();
        match msg {
            ServerMessage::GameInfo { data } => {
                assert_eq!(data.username, "alice");
                assert!(data.is_white);
                assert_eq!(data.opponent_username, "bob");
                assert_eq!(data.elo_rating, None);
            }
            _ => panic!("Wrong message type"),
        }
    }

    #[test]
    fn test_decode_game_state_roundtrip() {
        let msg = ServerMessage::GameState {
            state: BoardSnapshot::initial(),
            last_move: None,
            game_over: None,
        };
        let decoded = ServerMessage::decode(&msg.encode().unwrap()).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_decode_unknown_tag() {
        let err = ServerMessage::decode(r#"{"type":"time_update","ms":100}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_decode_missing_field() {
        // error 缺少 content
        let err = ServerMessage::decode(r#"{"type":"error"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed { .. }));
    }

    #[test]
    fn test_decode_broken_json() {
        let err = ServerMessage::decode("not json at all").unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed { .. }));
    }
}
