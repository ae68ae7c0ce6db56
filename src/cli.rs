//! CLIモジュール

use crate::action::Action;
use crate::config::{CliArgs, Config};
use crate::logging;
use crate::status::{self, DailyStatus, WeeklyStatus};
use crate::storage;
use crate::timesheet::Timesheet;
use anyhow::Result;
use chrono::Local;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

/// Time Tracker - 作業の開始・休憩・終了を記録するCLI
#[derive(Parser, Debug)]
#[command(name = "tracker")]
#[command(about = "作業時間トラッキングツール", long_about = None)]
pub struct Cli {
    /// ログの詳細度（-v: info, -vv: debug, -vvv: trace）
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// 日次ファイルの保存ディレクトリ
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// ストレージ種別
    #[arg(long, global = true)]
    pub storage: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// サブコマンド
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 作業を開始
    Start,
    /// 休憩を開始
    Break,
    /// 今日の作業を終了
    End,
    /// 今日または週のステータスを表示
    Status {
        /// 週のステータスを表形式で表示
        #[arg(short, long)]
        table: bool,

        /// 対象週（今年のISO週番号、または -1 のような今週からの相対値）
        #[arg(short, long, allow_negative_numbers = true)]
        week: Option<i8>,
    },
    /// 設定を管理
    Config {
        /// 現在の設定を表示
        #[arg(short, long)]
        list: bool,

        /// 設定ファイルをエディタで開く
        #[arg(short, long)]
        edit: bool,
    },
}

/// CLIエントリポイント
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let cli_args = CliArgs {
        data_dir: cli.data_dir,
        storage: cli.storage,
    };

    match cli.command {
        Commands::Start => track(&Config::load(&cli_args)?, Action::Start)?,
        Commands::Break => track(&Config::load(&cli_args)?, Action::Break)?,
        Commands::End => track(&Config::load(&cli_args)?, Action::End)?,
        Commands::Status { table, week } => {
            let config = Config::load(&cli_args)?;
            // --table単体は今週を表示
            let week = if table { week.or(Some(0)) } else { week };
            print_status(&config, table, week)?;
        }
        Commands::Config { list, edit } => {
            if list {
                let config = Config::load(&cli_args)?;
                print!("{}", config.to_toml()?);
            } else if edit {
                Config::edit()?;
            } else {
                println!("--list または --edit オプションを指定してください");
            }
        }
    }

    Ok(())
}

/// 今日のファイルにアクションを記録
///
/// 保存の失敗はログに出力し、プロセスは継続する。
fn track(config: &Config, action: Action) -> Result<()> {
    let today = Local::now().date_naive();
    let storage = storage::create_for_date(&config.storage, &config.data_dir, today)?;
    config.ensure_directories()?;
    let timesheet = Timesheet::new(storage);

    info!("{}を記録します", action);
    match timesheet.append(action) {
        Ok(entry) => info!("記録しました: {}", entry),
        Err(e) => error!("エントリの記録に失敗しました: {}", e),
    }

    Ok(())
}

/// ステータスを出力
fn print_status(config: &Config, table: bool, week: Option<i8>) -> Result<()> {
    let now = Local::now().fixed_offset();
    let today = now.date_naive();

    match week {
        None => {
            let storage = storage::create_for_date(&config.storage, &config.data_dir, today)?;
            let entries = Timesheet::new(storage).entries()?;
            if entries.is_empty() {
                println!("{}の記録はありません。", today);
                return Ok(());
            }
            let daily = DailyStatus::from_entries(today, &entries, Some(now), &config.day_rules())?;
            println!("{}", daily);
        }
        Some(week) => {
            let dates = status::week_dates(today, week)?;
            let weekly = WeeklyStatus::collect(&dates, now, &config.day_rules(), |date| {
                let storage = storage::create_for_date(&config.storage, &config.data_dir, date)?;
                Ok(Timesheet::new(storage).entries()?)
            })?;
            println!("{}", weekly.render(table));
        }
    }

    Ok(())
}
