//! アクションモジュール
//!
//! 記録対象の4種類のイベント（None / Start / Break / End）を表す。
//! JSONには表示名で書き出し、読み込み時は名前と数値コードの両方を受け付ける。

use crate::error::ActionError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// トラッキングイベント
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    None,
    Start,
    Break,
    End,
    /// 名前を持たない数値コード
    ///
    /// 数値で保存されたファイルを将来のコード追加後も読めるよう、
    /// 1〜4以外の整数も検証せずにそのまま保持する。
    Unknown(u64),
}

impl Action {
    /// 数値コードからアクションを作成（範囲外は`Unknown`）
    pub fn from_code(code: u64) -> Self {
        match code {
            1 => Action::None,
            2 => Action::Start,
            3 => Action::Break,
            4 => Action::End,
            other => Action::Unknown(other),
        }
    }

    /// 数値コード
    pub fn code(&self) -> u64 {
        match self {
            Action::None => 1,
            Action::Start => 2,
            Action::Break => 3,
            Action::End => 4,
            Action::Unknown(code) => *code,
        }
    }

    /// 表示名
    ///
    /// 名前のないコードは空文字列になる。
    pub fn name(&self) -> &'static str {
        match self {
            Action::None => "None",
            Action::Start => "Start",
            Action::Break => "Break",
            Action::End => "End",
            Action::Unknown(_) => "",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        match token.as_str() {
            "none" => Ok(Action::None),
            "start" => Ok(Action::Start),
            "break" => Ok(Action::Break),
            "end" => Ok(Action::End),
            _ => Err(ActionError::InvalidAction(token)),
        }
    }
}

impl Serialize for Action {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

struct ActionVisitor;

impl<'de> Visitor<'de> for ActionVisitor {
    type Value = Action;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an action name or an unsigned action code")
    }

    fn visit_str<E>(self, value: &str) -> Result<Action, E>
    where
        E: de::Error,
    {
        value.parse().map_err(de::Error::custom)
    }

    fn visit_u64<E>(self, value: u64) -> Result<Action, E>
    where
        E: de::Error,
    {
        Ok(Action::from_code(value))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Action, E>
    where
        E: de::Error,
    {
        u64::try_from(value)
            .map(Action::from_code)
            .map_err(|_| de::Error::invalid_value(de::Unexpected::Signed(value), &self))
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ActionVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(Action::None.to_string(), "None");
        assert_eq!(Action::Start.to_string(), "Start");
        assert_eq!(Action::Break.to_string(), "Break");
        assert_eq!(Action::End.to_string(), "End");
    }

    #[test]
    fn test_display_unnamed_code_is_empty() {
        assert_eq!(Action::Unknown(0).to_string(), "");
        assert_eq!(Action::from_code(19).to_string(), "");
    }

    #[test]
    fn test_parse_roundtrip_named() {
        for action in [Action::None, Action::Start, Action::Break, Action::End] {
            let parsed: Action = action.to_string().to_lowercase().parse().unwrap();
            assert_eq!(parsed, action);
        }
    }

    #[test]
    fn test_parse_case_and_whitespace() {
        assert_eq!(" END ".parse::<Action>().unwrap(), Action::End);
        assert_eq!("bReAk".parse::<Action>().unwrap(), Action::Break);
        assert_eq!("\tstart\n".parse::<Action>().unwrap(), Action::Start);
    }

    #[test]
    fn test_parse_unknown_fails() {
        let err = "unknown".parse::<Action>().unwrap_err();
        assert_eq!(err, ActionError::InvalidAction("unknown".to_string()));
    }

    #[test]
    fn test_codes() {
        assert_eq!(Action::None.code(), 1);
        assert_eq!(Action::End.code(), 4);
        assert_eq!(Action::from_code(3), Action::Break);
        assert_eq!(Action::from_code(19).code(), 19);
    }

    #[test]
    fn test_serialize_display_name() {
        assert_eq!(serde_json::to_string(&Action::Break).unwrap(), "\"Break\"");
        assert_eq!(serde_json::to_string(&Action::None).unwrap(), "\"None\"");
    }

    #[test]
    fn test_deserialize_name() {
        let action: Action = serde_json::from_str("\"Break\"").unwrap();
        assert_eq!(action, Action::Break);
    }

    #[test]
    fn test_deserialize_code() {
        let action: Action = serde_json::from_str("4").unwrap();
        assert_eq!(action, Action::End);
    }

    #[test]
    fn test_deserialize_out_of_range_code_is_kept() {
        let action: Action = serde_json::from_str("19").unwrap();
        assert_eq!(action, Action::Unknown(19));
    }

    #[test]
    fn test_deserialize_unknown_name_fails() {
        assert!(serde_json::from_str::<Action>("\"Whatever\"").is_err());
    }

    #[test]
    fn test_deserialize_negative_code_fails() {
        assert!(serde_json::from_str::<Action>("-1").is_err());
    }
}
