//! 终端前端
//!
//! 薄展示层：订阅会话快照渲染棋盘、棋谱与提示，把输入行解析成意图。
//! 所有规则都在核心里，这里只负责读和画。

use std::io::Write as _;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chess_client::network::SessionHandle;
use chess_client::session::{DrawOffer, NoticeLevel, SessionPhase, SessionSnapshot};
use chess_client::settings::ClientSettings;
use protocol::{BoardSnapshot, Notation, Square, BOARD_SIZE};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chess_client=info".parse()?),
        )
        .init();

    let settings = ClientSettings::load();

    let game_id = prompt("Provide id of your game: ", &settings.game_id)?;
    let username = prompt("Provide your username: ", &settings.username)?;

    let handle = SessionHandle::connect(&settings.server_address).await?;
    println!("Connected to the server!");
    handle.login(game_id, username)?;

    let mut snapshots = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                render(&snapshot);
                if snapshot.phase == SessionPhase::Terminated {
                    break;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !dispatch(&handle, line.trim()) {
                    break;
                }
            }
        }
    }

    handle.close().await;
    Ok(())
}

/// 读取一行输入，空行取默认值
fn prompt(label: &str, default: &str) -> Result<String> {
    if !default.is_empty() {
        print!("{}[{}] ", label, default);
    } else {
        print!("{}", label);
    }
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let line = line.trim();
    Ok(if line.is_empty() {
        default.to_string()
    } else {
        line.to_string()
    })
}

/// 把一行输入解析成意图并提交；返回 false 表示退出
fn dispatch(handle: &SessionHandle, line: &str) -> bool {
    let result = match line {
        "" => return true,
        "quit" | "exit" => return false,
        "draw" => handle.offer_draw(),
        "accept" => handle.accept_draw(),
        "reject" => handle.reject_draw(),
        "resign" => handle.resign(),
        "ping" => handle.ping(),
        _ => match parse_move(line) {
            Some((from, to)) => handle.request_move(from, to),
            None => {
                println!(
                    "Commands: <from> <to> (e.g. e2 e4), draw, accept, reject, resign, ping, quit"
                );
                return true;
            }
        },
    };

    // 被本地拒绝的意图只提示，由用户决定是否重试
    if let Err(e) = result {
        println!("{}", e);
    }
    true
}

/// 解析走法输入，支持 `e2 e4` 和 `e2:e4` 两种写法
fn parse_move(line: &str) -> Option<(Square, Square)> {
    let mut parts = line.split([' ', ':']).filter(|s| !s.is_empty());
    let from = parts.next()?.parse().ok()?;
    let to = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((from, to))
}

fn render(snapshot: &SessionSnapshot) {
    if let Some(notice) = &snapshot.notice {
        match notice.level {
            NoticeLevel::Info => println!("* {}", notice.text),
            NoticeLevel::Error => println!("! {}", notice.text),
        }
    }

    if snapshot.waiting_for_opponent {
        println!("Waiting for the opponent......");
        return;
    }

    let white_pov = snapshot.game_info.as_ref().map_or(true, |info| info.is_white);

    if let Some(info) = &snapshot.game_info {
        let side = if info.is_white { "White" } else { "Black" };
        match (info.elo_rating, info.opponent_elo_rating) {
            (Some(own), Some(opp)) => println!(
                "{}[{}] ({}) Vs. {}[{}]",
                info.username, own, side, info.opponent_username, opp
            ),
            _ => println!(
                "{} ({}) Vs. {}",
                info.username, side, info.opponent_username
            ),
        }
    }

    if let Some(board) = &snapshot.board {
        render_board(board, white_pov);
    }

    if snapshot.draw_offer == DrawOffer::Received {
        println!("Draw offered: type accept/reject");
    }

    render_history(snapshot);
}

/// 打印棋盘；存储顺序自上而下，视角翻转全在坐标换算里
fn render_board(board: &BoardSnapshot, white_pov: bool) {
    for row in 0..BOARD_SIZE {
        let mut cells = Vec::with_capacity(BOARD_SIZE);
        let mut rank_label = ' ';
        for col in 0..BOARD_SIZE {
            // 索引恒在 0..8 内，换算不会失败
            let Ok(square) = Square::from_indices(row, col, white_pov) else {
                continue;
            };
            rank_label = square.rank_char();
            cells.push(match board.get(square) {
                Some(piece) => piece.to_string(),
                None => "  .".to_string(),
            });
        }
        println!("{} |{}", rank_label, cells.join(" "));
    }

    let files: String = (0..BOARD_SIZE)
        .filter_map(|col| Square::from_indices(BOARD_SIZE - 1, col, white_pov).ok())
        .map(|square| format!("{:>3} ", square.file_char()))
        .collect();
    println!("   {}", files);
}

/// 按整回合打印棋谱
fn render_history(snapshot: &SessionSnapshot) {
    for row in snapshot.history.rows() {
        let white = Notation::render(row.white);
        let black = row.black.map(Notation::render);
        match black {
            Some(black) => println!(
                "{}. {}{}  {}{}",
                row.number, white.glyph, white.text, black.glyph, black.text
            ),
            None => println!("{}. {}{}", row.number, white.glyph, white.text),
        }
    }
}
