use crate::error::{Error, Result};
use futures::prelude::*;
use serde::de::DeserializeOwned;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use stream_cancel::{StreamExt, Trigger, Tripwire};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

/// Called from the network task after each event so the view can repaint.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Binary(Vec<u8>),
    Json(serde_json::Value),
}

impl Payload {
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(match self {
            Payload::Text(text) => serde_json::from_str(text)?,
            Payload::Binary(data) => serde_json::from_slice(data)?,
            Payload::Json(value) => T::deserialize(value)?,
        })
    }
}

/// Connection lifecycle as seen by a listener.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Open,
    Message(Payload),
    Close,
    Error(String),
}

pub trait EventSource {
    /// Next pending event, without blocking.
    fn try_next(&mut self) -> Option<Event>;
}

impl EventSource for Receiver<Event> {
    fn try_next(&mut self) -> Option<Event> {
        self.try_recv().ok()
    }
}

/// Opens a websocket to `endpoint` on the current tokio runtime. Dropping or
/// cancelling the returned trigger closes the connection, even while the
/// handshake is still pending.
pub fn connect(endpoint: String, waker: Waker) -> (Trigger, Receiver<Event>) {
    let (tx, rx) = std::sync::mpsc::channel();
    let (trigger, tripwire) = Tripwire::new();

    tokio::spawn(pump(endpoint, tripwire, move |event| forward(&tx, &waker, event)));

    (trigger, rx)
}

fn forward(tx: &Sender<Event>, waker: &Waker, event: Event) {
    if tx.send(event).is_ok() {
        waker();
    }
}

/// Drives one websocket connection and reports it through `on_event`.
///
/// Nothing is reported if the tripwire fires before the handshake completes.
/// Otherwise the sequence is either `Error, Close` for a failed connect or
/// `Open, (Message | Error)*, Close`.
pub async fn pump<F>(endpoint: String, tripwire: Tripwire, mut on_event: F)
where
    F: FnMut(Event) + Send,
{
    let connected = tokio::select! {
        _ = tripwire.clone() => {
            log::debug!("connect to {endpoint} cancelled");
            return;
        }
        res = connect_async(endpoint.as_str()) => res,
    };

    let stream = match connected {
        Ok((stream, _response)) => stream,
        Err(e) => {
            let e = Error::from(e);
            log::error!("failed to connect to {endpoint}: {e}");
            on_event(Event::Error(e.to_string()));
            on_event(Event::Close);
            return;
        }
    };

    log::info!("websocket connected to {endpoint}");
    on_event(Event::Open);

    let (mut sink, stream) = stream.split();
    let mut incoming = stream.take_until_if(tripwire);

    while let Some(msg) = incoming.next().await {
        match msg {
            Ok(Message::Text(text)) => on_event(Event::Message(Payload::Text(text))),
            Ok(Message::Binary(data)) => on_event(Event::Message(Payload::Binary(data))),
            Ok(_) => {}
            Err(e) => {
                let e = Error::from(e);
                log::error!("websocket error on {endpoint}: {e}");
                on_event(Event::Error(e.to_string()));
                // tungstenite does not recover from read errors
                break;
            }
        }
    }

    if let Err(e) = sink.close().await {
        log::debug!("closing {endpoint}: {e}");
    }
    log::info!("websocket to {endpoint} closed");
    on_event(Event::Close);
}
