//! 连接运行时
//!
//! 连接由会话独占：只有这里可以发送和关闭。入站帧经过单一的
//! "解码 → 状态转移"管道，转移后的快照通过 watch 通道广播给展示层，
//! 不存在散落各处的回调。

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use protocol::{
    ClientMessage, Connector, FrameReader, FrameWriter, ServerMessage, Square, TcpConnector,
};

use crate::error::SessionError;
use crate::session::{Intent, Session, SessionSnapshot};

/// 会话句柄
///
/// 展示层的唯一入口：订阅快照、提交意图、决定性关闭。
pub struct SessionHandle {
    session: Arc<Mutex<Session>>,
    outbound_tx: mpsc::UnboundedSender<ClientMessage>,
    snapshot_tx: Arc<watch::Sender<SessionSnapshot>>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
    reader_task: JoinHandle<()>,
    writer_task: JoinHandle<()>,
}

impl SessionHandle {
    /// 连接服务器并启动收发任务
    pub async fn connect(addr: &str) -> Result<Self, SessionError> {
        let conn = TcpConnector.connect(addr).await?;
        tracing::info!("Connected to server: {}", addr);

        let (reader, writer) = conn.split();
        let session = Arc::new(Mutex::new(Session::new()));
        let initial = lock(&session).snapshot();
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);
        let snapshot_tx = Arc::new(snapshot_tx);
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        let reader_task = tokio::spawn(read_loop(
            reader,
            session.clone(),
            snapshot_tx.clone(),
            outbound_tx.clone(),
        ));
        let writer_task = tokio::spawn(write_loop(
            writer,
            outbound_rx,
            session.clone(),
            snapshot_tx.clone(),
        ));

        Ok(Self {
            session,
            outbound_tx,
            snapshot_tx,
            snapshot_rx,
            reader_task,
            writer_task,
        })
    }

    /// 订阅会话快照
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_rx.clone()
    }

    /// 当前快照
    pub fn snapshot(&self) -> SessionSnapshot {
        lock(&self.session).snapshot()
    }

    /// 提交意图：接受则入发送队列，否则本地拒绝
    pub fn submit(&self, intent: Intent) -> Result<(), SessionError> {
        let frame = {
            let mut session = lock(&self.session);
            let frame = session.submit(intent)?;
            let _ = self.snapshot_tx.send(session.snapshot());
            frame
        };
        self.outbound_tx
            .send(frame)
            .map_err(|_| SessionError::NotConnected)
    }

    /// 登录指定对局
    pub fn login(
        &self,
        game_id: impl Into<String>,
        username: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.submit(Intent::Login {
            game_id: game_id.into(),
            username: username.into(),
        })
    }

    /// 走棋
    pub fn request_move(&self, from: Square, to: Square) -> Result<(), SessionError> {
        self.submit(Intent::Move { from, to })
    }

    /// 提和
    pub fn offer_draw(&self) -> Result<(), SessionError> {
        self.submit(Intent::OfferDraw)
    }

    /// 接受和棋
    pub fn accept_draw(&self) -> Result<(), SessionError> {
        self.submit(Intent::AcceptDraw)
    }

    /// 拒绝和棋
    pub fn reject_draw(&self) -> Result<(), SessionError> {
        self.submit(Intent::RejectDraw)
    }

    /// 认输
    pub fn resign(&self) -> Result<(), SessionError> {
        self.submit(Intent::Resign)
    }

    /// 催促对手
    pub fn ping(&self) -> Result<(), SessionError> {
        self.submit(Intent::Ping)
    }

    /// 决定性关闭：停掉收发任务、释放连接、强制进入终止阶段
    ///
    /// 外部监督者据此可以安全地重建连接，不会泄漏旧连接的任务。
    pub async fn close(self) {
        self.reader_task.abort();
        self.writer_task.abort();
        let _ = self.reader_task.await;
        let _ = self.writer_task.await;

        let mut session = lock(&self.session);
        session.handle_disconnect("Connection closed");
        let _ = self.snapshot_tx.send(session.snapshot());
        tracing::info!("Session closed");
    }
}

/// 锁会话；持锁时转移函数不会 panic，中毒时直接取回内部数据
fn lock(session: &Arc<Mutex<Session>>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(|e| e.into_inner())
}

/// 读循环：唯一的"解码 → 状态转移"管道
async fn read_loop(
    mut reader: FrameReader<OwnedReadHalf>,
    session: Arc<Mutex<Session>>,
    snapshot_tx: Arc<watch::Sender<SessionSnapshot>>,
    outbound_tx: mpsc::UnboundedSender<ClientMessage>,
) {
    loop {
        match reader.read_frame::<ServerMessage>().await {
            Ok(msg) => {
                tracing::debug!("Server message: {:?}", msg);
                let replies = {
                    let mut session = lock(&session);
                    let replies = session.apply(msg);
                    let _ = snapshot_tx.send(session.snapshot());
                    replies
                };
                for reply in replies {
                    if outbound_tx.send(reply).is_err() {
                        return;
                    }
                }
            }
            Err(e) if !e.is_fatal() => {
                // 未知或残缺的帧：丢弃但保持会话存活
                tracing::warn!("Discarding malformed frame: {}", e);
            }
            Err(e) => {
                tracing::warn!("Connection lost: {}", e);
                let mut session = lock(&session);
                session.handle_disconnect(e.to_string());
                let _ = snapshot_tx.send(session.snapshot());
                return;
            }
        }
    }
}

/// 写循环：排空意图队列
async fn write_loop(
    mut writer: FrameWriter<OwnedWriteHalf>,
    mut outbound_rx: mpsc::UnboundedReceiver<ClientMessage>,
    session: Arc<Mutex<Session>>,
    snapshot_tx: Arc<watch::Sender<SessionSnapshot>>,
) {
    while let Some(msg) = outbound_rx.recv().await {
        if let Err(e) = writer.write_frame(&msg).await {
            tracing::error!("Failed to send message: {}", e);
            let mut session = lock(&session);
            session.handle_disconnect(e.to_string());
            let _ = snapshot_tx.send(session.snapshot());
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{DrawOffer, SessionPhase};
    use protocol::{BoardSnapshot, Connection, GameInfo, Listener, TcpListener};
    use std::time::Duration;

    async fn wait_for(
        rx: &mut watch::Receiver<SessionSnapshot>,
        cond: impl Fn(&SessionSnapshot) -> bool,
    ) -> SessionSnapshot {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                {
                    let snapshot = rx.borrow();
                    if cond(&snapshot) {
                        return snapshot.clone();
                    }
                }
                rx.changed().await.expect("snapshot channel closed");
            }
        })
        .await
        .expect("condition not reached in time")
    }

    fn game_info() -> GameInfo {
        GameInfo {
            username: "alice".to_string(),
            is_white: true,
            opponent_username: "bob".to_string(),
            elo_rating: None,
            opponent_elo_rating: None,
        }
    }

    #[tokio::test]
    async fn test_full_session_against_fake_authority() {
        let mut listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // 扮演服务端
        let server = tokio::spawn(async move {
            let mut conn = listener.accept().await.unwrap();

            let msg: ClientMessage = conn.recv().await.unwrap();
            match msg {
                ClientMessage::Login { game_id, username } => {
                    assert_eq!(game_id, "42");
                    assert_eq!(username, "alice");
                }
                _ => panic!("Expected login"),
            }

            conn.send(&ServerMessage::WaitingForOpponent).await.unwrap();
            conn.send(&ServerMessage::OppLoginSuccess).await.unwrap();
            conn.send(&ServerMessage::GameInfo { data: game_info() })
                .await
                .unwrap();
            conn.send(&ServerMessage::GameState {
                state: BoardSnapshot::initial(),
                last_move: None,
                game_over: None,
            })
            .await
            .unwrap();

            let msg: ClientMessage = conn.recv().await.unwrap();
            assert!(matches!(msg, ClientMessage::Move { .. }));
            conn
        });

        let handle = SessionHandle::connect(&addr).await.unwrap();
        let mut rx = handle.subscribe();

        handle.login("42", "alice").unwrap();
        let snapshot = wait_for(&mut rx, |s| {
            s.phase == SessionPhase::ActiveGame && s.game_info.is_some() && s.board.is_some()
        })
        .await;
        assert_eq!(snapshot.game_info.unwrap().username, "alice");

        handle
            .request_move("e2".parse().unwrap(), "e4".parse().unwrap())
            .unwrap();

        let _conn = server.await.unwrap();
        handle.close().await;
    }

    #[tokio::test]
    async fn test_malformed_frame_does_not_kill_session() {
        let mut listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let mut conn = listener.accept().await.unwrap();
            // 先发一个未知类型的帧，再发正常消息
            conn.send(&serde_json::json!({"type": "time_update", "ms": 100}))
                .await
                .unwrap();
            conn.send(&ServerMessage::LoginSuccess).await.unwrap();
            conn
        });

        let handle = SessionHandle::connect(&addr).await.unwrap();
        let mut rx = handle.subscribe();

        // 坏帧被丢弃，后续消息照常转移
        let snapshot = wait_for(&mut rx, |s| s.phase == SessionPhase::ActiveGame).await;
        assert!(snapshot.board.is_none());

        let _conn = server.await.unwrap();
        handle.close().await;
    }

    #[tokio::test]
    async fn test_server_disconnect_terminates_session() {
        let mut listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let conn = listener.accept().await.unwrap();
            drop(conn);
        });

        let handle = SessionHandle::connect(&addr).await.unwrap();
        let mut rx = handle.subscribe();

        let snapshot = wait_for(&mut rx, |s| s.phase == SessionPhase::Terminated).await;
        assert!(snapshot.notice.is_some());

        // 终止后的意图本地拒绝
        assert!(matches!(
            handle.login("42", "alice"),
            Err(SessionError::PhaseViolation { .. })
        ));

        server.await.unwrap();
        handle.close().await;
    }

    #[tokio::test]
    async fn test_auto_reject_sent_on_wire() {
        let mut listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let mut conn = listener.accept().await.unwrap();
            let _: ClientMessage = conn.recv().await.unwrap(); // login

            conn.send(&ServerMessage::LoginSuccess).await.unwrap();
            conn.send(&ServerMessage::DrawOfferReceived).await.unwrap();
            // 对方又走了一步：客户端应自动回拒悬挂的提议
            conn.send(&ServerMessage::GameState {
                state: BoardSnapshot::initial(),
                last_move: None,
                game_over: None,
            })
            .await
            .unwrap();

            let msg: ClientMessage = conn.recv().await.unwrap();
            assert_eq!(msg, ClientMessage::RejectDraw);
            conn
        });

        let handle = SessionHandle::connect(&addr).await.unwrap();
        let mut rx = handle.subscribe();
        handle.login("42", "alice").unwrap();

        let snapshot = wait_for(&mut rx, |s| s.board.is_some()).await;
        assert_eq!(snapshot.draw_offer, DrawOffer::None);

        let _conn = server.await.unwrap();
        handle.close().await;
    }
}
