//! Host side of the hardware bridge variant.
//!
//! The view hands two channels to [`start_listening`]. The host connects to
//! the bridge websocket and pushes connection status into one channel and
//! every received packet into the other.

use crate::error::{Error, Result};
use crate::packet::{BridgeStatus, LastPacket};
use crate::transport::{self, Event, EventSource, Payload, Waker};
use serde::Serialize;
use std::sync::mpsc::{Receiver, Sender};
use stream_cancel::{Trigger, Tripwire};

/// One-way pipe from the host into the view.
#[derive(Clone)]
pub struct Channel {
    tx: Sender<serde_json::Value>,
    waker: Waker,
}

pub fn channel(waker: Waker) -> (Channel, Receiver<serde_json::Value>) {
    let (tx, rx) = std::sync::mpsc::channel();
    (Channel { tx, waker }, rx)
}

impl Channel {
    pub fn send<M: Serialize>(&self, msg: M) -> Result<()> {
        let value = serde_json::to_value(msg)?;
        self.tx.send(value).map_err(|_| Error::Channel)?;
        (self.waker)();
        Ok(())
    }
}

/// Both channels of a packet view, seen as one event stream.
pub struct BridgeSource {
    status: Receiver<serde_json::Value>,
    packets: Receiver<serde_json::Value>,
}

impl BridgeSource {
    pub fn new(status: Receiver<serde_json::Value>, packets: Receiver<serde_json::Value>) -> Self {
        Self { status, packets }
    }
}

impl EventSource for BridgeSource {
    fn try_next(&mut self) -> Option<Event> {
        while let Ok(value) = self.status.try_recv() {
            match serde_json::from_value::<BridgeStatus>(value) {
                Ok(BridgeStatus::SocketConnected) => return Some(Event::Open),
                Ok(BridgeStatus::SocketClosed) => return Some(Event::Close),
                Ok(BridgeStatus::Error(e)) => return Some(Event::Error(e)),
                Err(e) => log::warn!("dropping status message: {e}"),
            }
        }

        self.packets
            .try_recv()
            .ok()
            .map(|value| Event::Message(Payload::Json(value)))
    }
}

/// Registers both channels with the host and starts listening on `endpoint`.
pub fn start_listening(endpoint: String, waker: Waker) -> (Trigger, BridgeSource) {
    let (on_status, status_rx) = channel(waker.clone());
    let (on_packet, packet_rx) = channel(waker);
    let (trigger, tripwire) = Tripwire::new();

    tokio::spawn(listen_to_bridge(endpoint, on_status, on_packet, tripwire));

    (trigger, BridgeSource::new(status_rx, packet_rx))
}

pub async fn listen_to_bridge(
    endpoint: String,
    on_status: Channel,
    on_packet: Channel,
    tripwire: Tripwire,
) {
    transport::pump(endpoint, tripwire, move |event| {
        let sent = match event {
            Event::Open => on_status.send(BridgeStatus::SocketConnected),
            Event::Close => on_status.send(BridgeStatus::SocketClosed),
            Event::Error(e) => on_status.send(BridgeStatus::Error(e)),
            Event::Message(payload) => match payload.decode::<serde_json::Value>() {
                Ok(packet) => on_packet.send(LastPacket { packet }),
                Err(e) => {
                    log::warn!("undecodable bridge frame: {e}");
                    Ok(())
                }
            },
        };
        if let Err(e) = sent {
            log::debug!("view no longer listening: {e}");
        }
    })
    .await
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::listener::Listener;
    use futures::prelude::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::protocol::Message;

    fn no_wake() -> Waker {
        Arc::new(|| {})
    }

    fn source() -> (Channel, Channel, BridgeSource) {
        let (status, status_rx) = channel(no_wake());
        let (packets, packet_rx) = channel(no_wake());
        (status, packets, BridgeSource::new(status_rx, packet_rx))
    }

    #[test]
    fn status_messages_map_to_events() {
        let (status, _packets, mut source) = source();
        status.send(BridgeStatus::SocketConnected).unwrap();
        status.send(json!({"bogus": 1})).unwrap();
        status.send(BridgeStatus::Error("timeout".into())).unwrap();
        status.send(BridgeStatus::SocketClosed).unwrap();

        assert_eq!(source.try_next(), Some(Event::Open));
        assert_eq!(source.try_next(), Some(Event::Error("timeout".into())));
        assert_eq!(source.try_next(), Some(Event::Close));
        assert_eq!(source.try_next(), None);
    }

    #[test]
    fn packets_reach_store() {
        let (status, packets, source) = source();
        let (trigger, _tripwire) = Tripwire::new();
        let mut listener = Listener::<LastPacket, _>::new(source, trigger);

        status.send(BridgeStatus::SocketConnected).unwrap();
        packets.send(LastPacket { packet: json!({"seq": 1}) }).unwrap();
        packets.send(json!({"no_envelope": true})).unwrap();
        packets.send(LastPacket { packet: json!({"seq": 2}) }).unwrap();
        packets.send(json!("garbage")).unwrap();
        listener.poll();

        assert!(listener.store().is_connected());
        assert_eq!(
            listener.store().current().map(|p| &p.packet),
            Some(&json!({"seq": 2}))
        );
    }

    #[test]
    fn send_after_view_is_gone_fails() {
        let (status, _packets, source) = source();
        drop(source);
        assert!(matches!(
            status.send(BridgeStatus::SocketClosed),
            Err(Error::Channel)
        ));
    }

    #[tokio::test]
    async fn forwards_bridge_frames() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
            ws.send(Message::Binary(br#"{"rssi":-80}"#.to_vec())).await.unwrap();
            ws.send(Message::Binary(vec![0x01, 0x02])).await.unwrap();
            ws.send(Message::Text(r#"[1,2]"#.into())).await.unwrap();
            ws.close(None).await.unwrap();
            while let Some(Ok(_)) = ws.next().await {}
        });

        let (_trigger, mut source) = start_listening(format!("ws://{addr}"), no_wake());

        let events = tokio::task::spawn_blocking(move || {
            let mut events = vec![];
            let deadline = std::time::Instant::now() + Duration::from_secs(5);
            while std::time::Instant::now() < deadline {
                match source.try_next() {
                    Some(Event::Close) => {
                        events.push(Event::Close);
                        events.extend(std::iter::from_fn(|| source.try_next()));
                        break;
                    }
                    Some(event) => events.push(event),
                    None => std::thread::sleep(Duration::from_millis(10)),
                }
            }
            events
        })
        .await
        .unwrap();

        // only the order within each channel is fixed
        assert_eq!(events.first(), Some(&Event::Open));
        let packets: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                Event::Message(p) => Some(p.decode::<LastPacket>().unwrap().packet),
                _ => None,
            })
            .collect();
        assert_eq!(packets, [json!({"rssi": -80}), json!([1, 2])]);
    }
}
