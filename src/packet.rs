use crate::render::{Body, Render};
use serde::{Deserialize, Serialize};

/// Most recent packet forwarded by the hardware bridge. No schema is enforced
/// on the inner value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastPacket {
    pub packet: serde_json::Value,
}

/// Connection status reported by the bridge host on its status channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BridgeStatus {
    SocketConnected,
    Error(String),
    SocketClosed,
}

impl Render for LastPacket {
    fn body(&self) -> Body {
        // serializing a Value cannot fail
        Body::Dump(serde_json::to_string_pretty(&self.packet).unwrap_or_default())
    }
}
