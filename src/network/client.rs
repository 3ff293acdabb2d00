use crate::error::ClientError;
use crate::network::protocol::OutboundEvent;
use crate::session::effects::Transport;
use crate::session::runner::SessionEvent;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// Send half handed to the session. Frames are written by the connection
/// task so the session never waits on the socket.
#[derive(Debug, Clone)]
pub struct OutboundSender {
    tx: mpsc::UnboundedSender<OutboundEvent>,
}

impl Transport for OutboundSender {
    fn send(&mut self, event: OutboundEvent) -> Result<(), ClientError> {
        self.tx.send(event).map_err(|_| ClientError::ChannelClosed)
    }
}

pub fn outbound_channel() -> (OutboundSender, mpsc::UnboundedReceiver<OutboundEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (OutboundSender { tx }, rx)
}

pub struct NetworkClient {
    url: String,
}

impl NetworkClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Drives one connection until it ends.
    ///
    /// Pushes `Opened` once the handshake completes, every text frame as
    /// `Message`, and finally `Closed` or `Failed`. There is no reconnect.
    pub async fn run(
        &self,
        events: mpsc::Sender<SessionEvent>,
        mut outbound: mpsc::UnboundedReceiver<OutboundEvent>,
    ) -> Result<(), ClientError> {
        tracing::info!(url = %self.url, "connecting");
        let stream = match connect_async(self.url.as_str()).await {
            Ok((stream, _)) => stream,
            Err(e) => {
                tracing::error!(url = %self.url, error = %e, "failed to connect");
                let _ = events.send(SessionEvent::Failed(e.to_string())).await;
                return Err(e.into());
            }
        };
        let (mut write, mut read) = stream.split();

        // 1. Open
        events
            .send(SessionEvent::Opened)
            .await
            .map_err(|_| ClientError::ChannelClosed)?;

        // 2. Pumps
        let writer = async move {
            while let Some(event) = outbound.recv().await {
                let json = event.encode()?;
                tracing::debug!(%json, "sending");
                write.send(Message::Text(json)).await?;
            }
            write.close().await?;
            Ok::<(), ClientError>(())
        };

        let reader_events = events.clone();
        let reader = async move {
            while let Some(frame) = read.next().await {
                match frame? {
                    Message::Text(text) => {
                        if reader_events.send(SessionEvent::Message(text)).await.is_err() {
                            break;
                        }
                    }
                    Message::Close(frame) => {
                        tracing::info!(?frame, "server closed connection");
                        break;
                    }
                    Message::Binary(data) => {
                        tracing::debug!(len = data.len(), "ignoring binary frame");
                    }
                    _ => {}
                }
            }
            Ok::<(), ClientError>(())
        };

        let result = tokio::select! {
            res = reader => res,
            res = writer => res,
        };

        let end = match &result {
            Ok(()) => SessionEvent::Closed,
            Err(e) => SessionEvent::Failed(e.to_string()),
        };
        let _ = events.send(end).await;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn role_event_goes_out_after_open_and_frames_come_back() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(socket).await.unwrap();
            let first = ws.next().await.unwrap().unwrap();
            ws.send(Message::Text(
                r#"{"type":"init","join":"j","watch":"w"}"#.to_string(),
            ))
            .await
            .unwrap();
            ws.close(None).await.unwrap();
            first.into_text().unwrap()
        });

        let (mut sender, outbound_rx) = outbound_channel();
        let (events_tx, mut events_rx) = mpsc::channel(16);
        let client = NetworkClient::new(format!("ws://{}", addr));
        let connection = tokio::spawn(async move { client.run(events_tx, outbound_rx).await });

        assert_eq!(events_rx.recv().await, Some(SessionEvent::Opened));
        sender.send(OutboundEvent::Init).unwrap();

        assert_eq!(
            events_rx.recv().await,
            Some(SessionEvent::Message(
                r#"{"type":"init","join":"j","watch":"w"}"#.to_string()
            ))
        );
        assert_eq!(events_rx.recv().await, Some(SessionEvent::Closed));
        assert_eq!(server.await.unwrap(), r#"{"type":"init"}"#);
        assert!(connection.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn refused_connection_reports_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (_sender, outbound_rx) = outbound_channel();
        let (events_tx, mut events_rx) = mpsc::channel(4);
        let client = NetworkClient::new(format!("ws://{}", addr));

        assert!(client.run(events_tx, outbound_rx).await.is_err());
        assert!(matches!(events_rx.recv().await, Some(SessionEvent::Failed(_))));
    }

    #[test]
    fn sender_reports_closed_channel() {
        let (mut sender, rx) = outbound_channel();
        drop(rx);
        assert!(matches!(
            sender.send(OutboundEvent::Play { column: 1 }),
            Err(ClientError::ChannelClosed)
        ));
    }
}
