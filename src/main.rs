//! Day Tracker - 日次JSONファイルに作業の開始・休憩・終了を記録するタイムトラッカー

mod action;
mod cli;
mod config;
mod entries;
mod entry;
mod error;
mod json_store;
mod logging;
mod status;
mod storage;
mod timesheet;

use anyhow::Result;

fn main() -> Result<()> {
    cli::run()
}
