//! WebSocket Handler - 书籍事件推送

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use crate::infrastructure::events::EventPublisher;
use crate::infrastructure::http::state::AppState;

/// 书籍 WebSocket 连接（同一本书的其他编辑器据此重新索引）
pub async fn book_websocket_handler(
    ws: WebSocketUpgrade,
    Path(book_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_book_socket(socket, book_id, state))
}

async fn handle_book_socket(socket: WebSocket, book_id: i64, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();

    tracing::info!(book_id, "WebSocket connected");
    book_session(&state.event_publisher, book_id, sender, receiver).await;
    tracing::info!(book_id, "WebSocket disconnected");
}

/// 一个编辑器连接的完整会话：订阅 → 双向转发 → 回收通道
///
/// 任一方向结束时另一方向的任务被中止并等待退出，
/// 订阅在 `release` 之前已被丢弃。
async fn book_session<S, R>(
    publisher: &EventPublisher,
    book_id: i64,
    mut sender: S,
    mut receiver: R,
) where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: Display + Send,
    R: Stream<Item = Result<Message, axum::Error>> + Unpin + Send + 'static,
{
    let mut event_rx = publisher.subscribe(book_id);

    // 事件转发任务
    let mut forward_task = tokio::spawn(async move {
        loop {
            let event = match event_rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(book_id, skipped, "WebSocket receiver lagged");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let msg = match serde_json::to_string(&event) {
                Ok(json) => Message::Text(json),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize event");
                    continue;
                }
            };

            if let Err(e) = sender.send(msg).await {
                tracing::debug!(book_id, error = %e, "Failed to send WebSocket message");
                break;
            }
        }
    });

    // 接收客户端消息（心跳）
    let mut receive_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::info!(book_id, "WebSocket closed by client");
                    break;
                }
                Err(e) => {
                    tracing::debug!(book_id, error = %e, "WebSocket error");
                    break;
                }
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut forward_task => {
            receive_task.abort();
            let _ = receive_task.await;
        }
        _ = &mut receive_task => {
            forward_task.abort();
            let _ = forward_task.await;
        }
    }

    publisher.release(book_id);
}
