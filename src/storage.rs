//! ストレージ抽象モジュール

use crate::entries::Entries;
use crate::error::StorageError;
use crate::json_store::JsonStore;
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

/// JSONストレージの種別タグ
pub const JSON_STORAGE: &str = "json";

/// エントリ集合の永続化先
pub trait StorageProvider {
    /// エントリ集合を保存
    fn save(&self, entries: &Entries) -> Result<(), StorageError>;

    /// エントリ集合を読み込む
    ///
    /// 保存先がまだ存在しない場合は`entries`を呼び出し側の値のまま残し、成功を返す。
    fn read(&self, entries: &mut Entries) -> Result<(), StorageError>;
}

impl<S: StorageProvider + ?Sized> StorageProvider for Box<S> {
    fn save(&self, entries: &Entries) -> Result<(), StorageError> {
        (**self).save(entries)
    }

    fn read(&self, entries: &mut Entries) -> Result<(), StorageError> {
        (**self).read(entries)
    }
}

/// 日付からファイル名を生成
///
/// 形式: YYYY-MM-DD.json
pub fn file_name_for(date: NaiveDate) -> String {
    format!("{}.json", date.format("%Y-%m-%d"))
}

/// 今日のファイル名
pub fn today_file_name() -> String {
    file_name_for(Local::now().date_naive())
}

/// 種別タグからストレージを作成
///
/// `path`を省略した場合は作業ディレクトリの今日のファイルを使う。
pub fn create(
    storage_type: &str,
    path: Option<PathBuf>,
) -> Result<Box<dyn StorageProvider>, StorageError> {
    match storage_type {
        JSON_STORAGE => {
            let path = path.unwrap_or_else(|| PathBuf::from(today_file_name()));
            Ok(Box::new(JsonStore::new(path)))
        }
        other => Err(StorageError::UnsupportedStorage(other.to_string())),
    }
}

/// ディレクトリと日付を指定してストレージを作成
pub fn create_for_date(
    storage_type: &str,
    dir: &Path,
    date: NaiveDate,
) -> Result<Box<dyn StorageProvider>, StorageError> {
    create(storage_type, Some(dir.join(file_name_for(date))))
}
