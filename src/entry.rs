//! エントリモジュール

use crate::action::Action;
use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 1件の記録（時刻とアクションの組）
///
/// 記録時のUTCオフセットをそのまま保持する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "time")]
    timestamp: DateTime<FixedOffset>,
    action: Action,
}

impl Entry {
    /// 時刻を指定してEntryを作成
    pub fn new_raw(timestamp: DateTime<FixedOffset>, action: Action) -> Self {
        Self { timestamp, action }
    }

    /// 現在時刻でEntryを作成
    pub fn new(action: Action) -> Self {
        Self::new_raw(Local::now().fixed_offset(), action)
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn action(&self) -> Action {
        self.action
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ time: {}, action: {} }}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.action
        )
    }
}
