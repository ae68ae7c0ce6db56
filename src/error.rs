//! エラー型定義モジュール

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// アクション解析エラー
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ActionError {
    #[error("無効なアクション: {0:?}")]
    InvalidAction(String),
}

/// ストレージエラー
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("エントリのJSON変換に失敗しました: {0}")]
    Marshal(#[source] serde_json::Error),

    #[error("ファイル書き込みエラー: {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("ファイル読み込みエラー: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSONからのエントリ復元に失敗しました: {}", path.display())]
    Unmarshal {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("未対応のストレージプロバイダ: '{0}'")]
    UnsupportedStorage(String),
}

/// タイムシートエラー
#[derive(Error, Debug)]
pub enum TimesheetError {
    #[error("ストレージエラー: {0}")]
    Storage(#[from] StorageError),

    #[error("時間差が負になりました（エントリの順序が逆です）")]
    NegativeDuration,
}

/// 設定エラー
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IOエラー: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML解析エラー: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("TOML出力エラー: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("不正な設定値: {0}")]
    InvalidValue(String),

    #[error("ディレクトリ作成エラー: {0}")]
    DirectoryCreationError(io::Error),

    #[error("エディタ起動失敗: {0}")]
    EditorFailed(String),
}

/// ステータスエラー
#[derive(Error, Debug)]
pub enum StatusError {
    #[error("タイムシートエラー: {0}")]
    Timesheet(#[from] TimesheetError),

    #[error("ストレージエラー: {0}")]
    Storage(#[from] StorageError),

    #[error("無効な週: {0}")]
    InvalidWeek(i8),
}
