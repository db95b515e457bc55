#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

mod bridge;
mod config;
mod error;
mod listener;
mod nominal_state;
mod packet;
mod render;
mod store;
mod transport;
mod ui;

use clap::Parser;
use tokio::time::Duration;

fn main() -> error::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = config::Args::parse();

    let rt = tokio::runtime::Runtime::new()?;
    let handle = rt.handle().clone();
    let _enter = handle.enter();

    std::thread::spawn(move || {
        rt.block_on(async {
            loop {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
        })
    });

    ui::run(args.view())
}
