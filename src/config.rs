//! 設定モジュール

use crate::error::ConfigError;
use crate::status::{BreakLimit, DayRules};
use crate::storage::JSON_STORAGE;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::process::Command;

/// アプリケーション設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// 日次ファイルの保存ディレクトリ
    pub data_dir: PathBuf,
    /// ストレージ種別
    pub storage: String,
    /// 1日の目標作業時間（分）
    pub work_minutes_per_day: u32,
    /// 目標を超えて在席した場合に休憩判定から差し引く時間（分）
    pub break_threshold: u32,
    /// 作業時間ごとの必要休憩
    pub break_limits: Vec<BreakLimit>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            storage: JSON_STORAGE.to_string(),
            work_minutes_per_day: 480,
            break_threshold: 1,
            break_limits: Vec::new(),
        }
    }
}

/// TOML設定ファイル用構造体
#[derive(Debug, Deserialize, Serialize, Default)]
struct FileConfig {
    data_dir: Option<String>,
    storage: Option<String>,
    work_minutes_per_day: Option<u32>,
    break_threshold: Option<u32>,
    // 配列テーブルはTOMLの末尾に出力されるよう最後に置く
    break_limits: Option<Vec<BreakLimit>>,
}

/// CLI引数
#[derive(Debug, Default)]
pub struct CliArgs {
    pub data_dir: Option<PathBuf>,
    pub storage: Option<String>,
}

impl Config {
    /// 設定を読み込む
    ///
    /// 優先順位: CLI引数 > 設定ファイル > デフォルト値
    pub fn load(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        let config_path = Self::config_file_path();
        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            let file_config: FileConfig = toml::from_str(&content)?;
            config.merge_file_config(&file_config);
        }

        config.merge_cli_args(cli_args);
        config.validate()?;

        Ok(config)
    }

    /// 設定ファイルのパスを取得
    pub fn config_file_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".tracker").join("config.toml")
    }

    /// 1日の目標作業時間
    pub fn daily_target(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.work_minutes_per_day))
    }

    /// 集計ルール
    pub fn day_rules(&self) -> DayRules {
        DayRules {
            target: self.daily_target(),
            break_limits: self.break_limits.clone(),
            break_threshold: TimeDelta::minutes(i64::from(self.break_threshold)),
        }
    }

    /// 有効な設定をTOML文字列に変換
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let file_config = FileConfig {
            data_dir: Some(self.data_dir.to_string_lossy().into_owned()),
            storage: Some(self.storage.clone()),
            work_minutes_per_day: Some(self.work_minutes_per_day),
            break_threshold: Some(self.break_threshold),
            break_limits: Some(self.break_limits.clone()),
        };
        Ok(toml::to_string(&file_config)?)
    }

    /// 設定ファイルをエディタで開く
    ///
    /// `$EDITOR`が未設定なら`vi`を使う。
    pub fn edit() -> Result<(), ConfigError> {
        let path = Self::config_file_path();
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(ConfigError::DirectoryCreationError)?;
            }
        }

        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
        let status = Command::new(&editor).arg(&path).status()?;
        if !status.success() {
            return Err(ConfigError::EditorFailed(format!("{} ({})", editor, status)));
        }
        Ok(())
    }

    /// ファイル設定をマージ
    fn merge_file_config(&mut self, file_config: &FileConfig) {
        if let Some(ref dir) = file_config.data_dir {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(ref storage) = file_config.storage {
            self.storage = storage.clone();
        }
        if let Some(minutes) = file_config.work_minutes_per_day {
            self.work_minutes_per_day = minutes;
        }
        if let Some(minutes) = file_config.break_threshold {
            self.break_threshold = minutes;
        }
        if let Some(ref limits) = file_config.break_limits {
            self.break_limits = limits.clone();
        }
    }

    /// CLI引数をマージ
    fn merge_cli_args(&mut self, cli_args: &CliArgs) {
        if let Some(ref dir) = cli_args.data_dir {
            self.data_dir = dir.clone();
        }
        if let Some(ref storage) = cli_args.storage {
            self.storage = storage.clone();
        }
    }

    /// 設定値をバリデート
    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "storage must not be empty".to_string(),
            ));
        }
        if self.work_minutes_per_day == 0 || self.work_minutes_per_day > 24 * 60 {
            return Err(ConfigError::InvalidValue(
                "work_minutes_per_day must be between 1 and 1440".to_string(),
            ));
        }
        if self.break_threshold > 24 * 60 {
            return Err(ConfigError::InvalidValue(
                "break_threshold must not exceed 1440".to_string(),
            ));
        }
        if let Some(limit) = self
            .break_limits
            .iter()
            .find(|l| l.start > 24 * 60 || l.minutes > 24 * 60)
        {
            return Err(ConfigError::InvalidValue(format!(
                "break limit {{ start = {}, minutes = {} }} must not exceed 1440",
                limit.start, limit.minutes
            )));
        }
        Ok(())
    }

    /// データディレクトリを作成
    ///
    /// 書き込みを伴うコマンドからのみ呼ぶ。
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir).map_err(ConfigError::DirectoryCreationError)?;
        }
        Ok(())
    }
}
