//! タイムシートモジュール

use crate::action::Action;
use crate::entries::Entries;
use crate::entry::Entry;
use crate::error::TimesheetError;
use crate::storage::StorageProvider;
use chrono::TimeDelta;
use tracing::debug;

/// ストレージ上の1日分の記録を操作する
pub struct Timesheet<S> {
    storage: S,
}

impl<S: StorageProvider> Timesheet<S> {
    /// 新しいTimesheetを作成
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// 現在時刻でアクションを記録
    ///
    /// 読み込み・追記・保存を1回ずつ行う。保存に失敗した場合、ファイルは追記前のまま残る。
    pub fn append(&self, action: Action) -> Result<Entry, TimesheetError> {
        let entry = Entry::new(action);
        let mut entries = Entries::new();

        self.storage.read(&mut entries)?;

        debug!("エントリを追加: {}", entry);
        entries.push(entry);

        self.storage.save(&entries)?;
        Ok(entry)
    }

    /// 保存済みのエントリを読み込む
    pub fn entries(&self) -> Result<Entries, TimesheetError> {
        let mut entries = Entries::new();
        self.storage.read(&mut entries)?;
        Ok(entries)
    }
}

/// 2つのエントリ間の経過時間（`right - left`）
pub fn difference(left: &Entry, right: &Entry) -> Result<TimeDelta, TimesheetError> {
    let delta = right.timestamp() - left.timestamp();
    if delta < TimeDelta::zero() {
        return Err(TimesheetError::NegativeDuration);
    }
    Ok(delta)
}
