//! 1日分のエントリ集合モジュール

use crate::entry::Entry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ファイルフォーマットの現行バージョン
pub const CURRENT_VERSION: u8 = 1;

/// 1日分の記録
///
/// `data`は追記順（＝時系列順）に並ぶ。`version`は読み込んだ値をそのまま引き継ぐ。
/// 欠けているフィールドは空の集合の値で補う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entries {
    #[serde(default)]
    data: Vec<Entry>,
    #[serde(default = "current_version")]
    version: u8,
}

fn current_version() -> u8 {
    CURRENT_VERSION
}

impl Entries {
    /// 空の集合を作成
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            version: CURRENT_VERSION,
        }
    }

    /// エントリを末尾に追加
    pub fn push(&mut self, entry: Entry) {
        self.data.push(entry);
    }

    pub fn data(&self) -> &[Entry] {
        &self.data
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn last(&self) -> Option<&Entry> {
        self.data.last()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for Entries {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Entries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data: Vec<String> = self.data.iter().map(Entry::to_string).collect();
        write!(f, "[ {} ]", data.join(", "))
    }
}
