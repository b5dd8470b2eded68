use crate::error::ChannelError;
use crate::signaling::channel::{ChannelEvent, SignalingChannel};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use huddle_core::SignalEvent;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

struct Connection {
    out_tx: mpsc::UnboundedSender<Message>,
    send_task: JoinHandle<()>,
    recv_task: JoinHandle<()>,
}

/// WebSocket implementation of [`SignalingChannel`] over
/// `tokio-tungstenite`. Text frames carry JSON-encoded [`SignalEvent`]s.
pub struct WsChannel {
    url: String,
    connection: Mutex<Option<Connection>>,
}

impl WsChannel {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connection: Mutex::new(None),
        }
    }
}

#[async_trait]
impl SignalingChannel for WsChannel {
    async fn connect(&self) -> Result<mpsc::Receiver<ChannelEvent>, ChannelError> {
        let mut guard = self.connection.lock().await;
        if guard.is_some() {
            return Err(ChannelError::AlreadyConnected);
        }

        let (ws_stream, _) =
            connect_async(self.url.as_str())
                .await
                .map_err(|e| ChannelError::Connect {
                    url: self.url.clone(),
                    reason: e.to_string(),
                })?;
        info!("Connected to relay at {}", self.url);

        let (mut sender, mut receiver) = ws_stream.split();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();
        let (event_tx, event_rx) = mpsc::channel::<ChannelEvent>(256);

        let send_task = tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                if sender.send(msg).await.is_err() {
                    break;
                }
            }
        });

        let recv_task = tokio::spawn(async move {
            while let Some(msg) = receiver.next().await {
                match msg {
                    Ok(Message::Text(text)) => match serde_json::from_str::<SignalEvent>(&text) {
                        Ok(event) => {
                            if event_tx.send(ChannelEvent::Signal(event)).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid signal frame from relay: {e}"),
                    },
                    Ok(Message::Close(_)) | Err(_) => break,
                    Ok(_) => {}
                }
            }
            let _ = event_tx.send(ChannelEvent::Disconnected).await;
        });

        *guard = Some(Connection {
            out_tx,
            send_task,
            recv_task,
        });

        Ok(event_rx)
    }

    async fn disconnect(&self) {
        let Some(conn) = self.connection.lock().await.take() else {
            return;
        };
        conn.send_task.abort();
        conn.recv_task.abort();
        info!("Disconnected from relay at {}", self.url);
    }

    async fn send(&self, event: SignalEvent) {
        let guard = self.connection.lock().await;
        let Some(conn) = guard.as_ref() else {
            debug!("Dropping signal while disconnected: {event:?}");
            return;
        };
        match serde_json::to_string(&event) {
            Ok(json) => {
                let _ = conn.out_tx.send(Message::Text(json.into()));
            }
            Err(e) => warn!("Failed to serialize signal event: {e}"),
        }
    }
}
