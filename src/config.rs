use clap::{Parser, Subcommand};

pub const NOMINAL_ENDPOINT: &str = "ws://127.0.0.1:9001";
pub const BRIDGE_ENDPOINT: &str = "ws://localhost:8765";

#[derive(Debug, Parser)]
#[command(name = "packet_visualizer", about = "Live view of navigation state and radio packets")]
pub struct Args {
    #[command(subcommand)]
    pub view: Option<View>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum View {
    /// Show the latest nominal state published by the navigation filter
    Nominal {
        #[arg(long, default_value = NOMINAL_ENDPOINT)]
        endpoint: String,
    },
    /// Dump the latest packet forwarded by the hardware bridge
    Packets {
        #[arg(long, default_value = BRIDGE_ENDPOINT)]
        endpoint: String,
    },
}

impl Args {
    pub fn view(self) -> View {
        self.view.unwrap_or(View::Nominal {
            endpoint: NOMINAL_ENDPOINT.to_string(),
        })
    }
}
