//! ステータス集計モジュール

use crate::action::Action;
use crate::entries::Entries;
use crate::entry::Entry;
use crate::error::StatusError;
use crate::timesheet::difference;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// 現在のトラッキング状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    Idle,
    Working,
    OnBreak,
}

impl TrackingState {
    /// 最後の集計対象エントリ（Start / Break / End）から状態を判定
    pub fn from_entries(entries: &Entries) -> Self {
        let last = entries
            .data()
            .iter()
            .rev()
            .map(Entry::action)
            .find(|a| is_tracked(*a));
        match last {
            Some(Action::Start) => TrackingState::Working,
            Some(Action::Break) => TrackingState::OnBreak,
            _ => TrackingState::Idle,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrackingState::Idle => "未稼働",
            TrackingState::Working => "作業中",
            TrackingState::OnBreak => "休憩中",
        }
    }
}

fn is_tracked(action: Action) -> bool {
    matches!(action, Action::Start | Action::Break | Action::End)
}

/// 休憩の下限
///
/// 対象時間が`start`分以上なら`minutes`分の休憩が必要。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakLimit {
    pub start: u32,
    pub minutes: u32,
}

/// 1日の集計ルール
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRules {
    /// 目標作業時間
    pub target: TimeDelta,
    pub break_limits: Vec<BreakLimit>,
    /// 目標を超えて在席している場合に、休憩判定の対象時間から差し引く猶予
    pub break_threshold: TimeDelta,
}

impl DayRules {
    /// 休憩ルールなしで作成
    pub fn new(target: TimeDelta) -> Self {
        Self {
            target,
            break_limits: Vec::new(),
            break_threshold: TimeDelta::zero(),
        }
    }

    /// 在席時間から必要な休憩時間を求める
    ///
    /// 在席時間が目標未満なら目標作業時間を、以上なら在席時間から猶予を引いた値を対象にし、
    /// 対象時間以下で最大の`start`を持つ下限を適用する。
    pub fn expected_break(&self, online: TimeDelta) -> TimeDelta {
        let span = if online >= self.target {
            online - self.break_threshold
        } else {
            self.target
        };

        match self
            .break_limits
            .iter()
            .filter(|limit| span >= TimeDelta::minutes(i64::from(limit.start)))
            .max_by_key(|limit| limit.start)
        {
            Some(limit) => {
                debug!("必要な休憩: {}分", limit.minutes);
                TimeDelta::minutes(i64::from(limit.minutes))
            }
            None => TimeDelta::zero(),
        }
    }
}

/// 1日分のステータス
#[derive(Debug, Clone)]
pub struct DailyStatus {
    pub date: NaiveDate,
    pub state: TrackingState,
    pub started: Option<DateTime<FixedOffset>>,
    pub ended: Option<DateTime<FixedOffset>>,
    pub work: TimeDelta,
    pub break_time: TimeDelta,
    /// 最初の開始から終了（または現在）までの時間
    pub online: TimeDelta,
    pub expected_break: TimeDelta,
    /// 開始 + 目標作業時間 + 休憩（取得済みと必要分の大きい方）
    pub estimated_end: Option<DateTime<FixedOffset>>,
    pub target: TimeDelta,
}

impl DailyStatus {
    /// エントリから作業時間と休憩時間を集計
    ///
    /// `now`を渡した場合、終わっていない作業・休憩を`now`まで数える。
    pub fn from_entries(
        date: NaiveDate,
        entries: &Entries,
        now: Option<DateTime<FixedOffset>>,
        rules: &DayRules,
    ) -> Result<Self, StatusError> {
        let mut work = TimeDelta::zero();
        let mut break_time = TimeDelta::zero();
        let mut open: Option<&Entry> = None;

        for entry in entries.data() {
            let action = entry.action();
            if !is_tracked(action) {
                debug!("集計対象外のアクション: コード{}", action.code());
                continue;
            }

            if let Some(segment) = open {
                let elapsed = difference(segment, entry)?;
                match segment.action() {
                    Action::Start => work += elapsed,
                    _ => break_time += elapsed,
                }
            }

            open = match action {
                Action::End => None,
                _ => Some(entry),
            };
        }

        if let (Some(segment), Some(now)) = (open, now) {
            let elapsed = difference(segment, &Entry::new_raw(now, Action::None))?;
            match segment.action() {
                Action::Start => work += elapsed,
                _ => break_time += elapsed,
            }
        }

        let state = TrackingState::from_entries(entries);
        let started = entries
            .data()
            .iter()
            .find(|e| e.action() == Action::Start)
            .map(Entry::timestamp);
        let ended = match state {
            TrackingState::Idle => entries
                .data()
                .iter()
                .rev()
                .find(|e| e.action() == Action::End)
                .map(Entry::timestamp),
            _ => None,
        };

        let last_tracked = entries
            .data()
            .iter()
            .rev()
            .find(|e| is_tracked(e.action()))
            .map(Entry::timestamp);
        let online = match (started, ended.or(now).or(last_tracked)) {
            (Some(start), Some(until)) => difference(
                &Entry::new_raw(start, Action::Start),
                &Entry::new_raw(until, Action::None),
            )?,
            _ => TimeDelta::zero(),
        };

        let expected_break = rules.expected_break(online);
        let estimated_end =
            started.map(|start| start + rules.target + break_time.max(expected_break));

        Ok(Self {
            date,
            state,
            started,
            ended,
            work,
            break_time,
            online,
            expected_break,
            estimated_end,
            target: rules.target,
        })
    }

    /// まだ取得していない必要休憩
    pub fn break_owed(&self) -> TimeDelta {
        (self.expected_break - self.break_time).max(TimeDelta::zero())
    }

    /// 目標作業時間までの残り（負の値は超過）
    pub fn remaining(&self) -> TimeDelta {
        self.target - self.work
    }
}

impl fmt::Display for DailyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let remaining = self.remaining();
        let remaining_display = if remaining < TimeDelta::zero() {
            format!("超過 {}", format_duration(-remaining))
        } else {
            format!("残り {}", format_duration(remaining))
        };

        writeln!(f, "=== {} のステータス ===", self.date)?;
        writeln!(f, "状態:     {}", self.state.label())?;
        writeln!(f, "開始:     {}", format_time(self.started))?;
        writeln!(f, "終了:     {}", format_time(self.ended))?;
        writeln!(f, "終了予定: {}", format_time(self.estimated_end))?;
        writeln!(f, "在席時間: {}", format_duration(self.online))?;
        writeln!(
            f,
            "作業時間: {} ({})",
            format_duration(self.work),
            remaining_display
        )?;
        write!(
            f,
            "休憩時間: {} (必要 {}, 未取得 {})",
            format_duration(self.break_time),
            format_duration(self.expected_break),
            format_duration(self.break_owed())
        )
    }
}

/// 1週間分のステータス
#[derive(Debug, Clone)]
pub struct WeeklyStatus {
    pub days: Vec<DailyStatus>,
}

impl WeeklyStatus {
    /// 指定日のエントリを読み込んで集計
    ///
    /// エントリのない日は結果に含めない。
    pub fn collect<F>(
        dates: &[NaiveDate],
        now: DateTime<FixedOffset>,
        rules: &DayRules,
        mut load: F,
    ) -> Result<Self, StatusError>
    where
        F: FnMut(NaiveDate) -> Result<Entries, StatusError>,
    {
        let today = now.date_naive();
        let mut days = Vec::new();

        for &date in dates {
            if date > today {
                continue;
            }
            let entries = load(date)?;
            if entries.is_empty() {
                continue;
            }
            let open_until = (date == today).then_some(now);
            days.push(DailyStatus::from_entries(date, &entries, open_until, rules)?);
        }

        Ok(Self { days })
    }

    pub fn total_work(&self) -> TimeDelta {
        self.days.iter().map(|d| d.work).sum()
    }

    pub fn total_break(&self) -> TimeDelta {
        self.days.iter().map(|d| d.break_time).sum()
    }

    /// 週のステータスを文字列に整形
    pub fn render(&self, table: bool) -> String {
        if self.days.is_empty() {
            return "この週の記録はありません。".to_string();
        }
        if table {
            self.render_table()
        } else {
            self.render_lines()
        }
    }

    fn render_lines(&self) -> String {
        let mut lines: Vec<String> = self
            .days
            .iter()
            .map(|d| {
                format!(
                    "{} ({}): 作業 {} / 休憩 {}",
                    d.date,
                    d.date.weekday(),
                    format_duration(d.work),
                    format_duration(d.break_time)
                )
            })
            .collect();
        lines.push(format!(
            "合計: 作業 {} / 休憩 {}",
            format_duration(self.total_work()),
            format_duration(self.total_break())
        ));
        lines.join("\n")
    }

    fn render_table(&self) -> String {
        let mut rows = vec![[
            "Date".to_string(),
            "Day".to_string(),
            "Start".to_string(),
            "End".to_string(),
            "Work".to_string(),
            "Break".to_string(),
        ]];
        for d in &self.days {
            rows.push([
                d.date.to_string(),
                d.date.weekday().to_string(),
                format_time(d.started),
                format_time(d.ended),
                format_hours(d.work),
                format_hours(d.break_time),
            ]);
        }
        rows.push([
            "Total".to_string(),
            String::new(),
            String::new(),
            String::new(),
            format_hours(self.total_work()),
            format_hours(self.total_break()),
        ]);

        let mut widths = [0usize; 6];
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.len());
            }
        }

        rows.iter()
            .map(|row| {
                row.iter()
                    .zip(widths.iter())
                    .map(|(cell, width)| format!("{:<width$}", cell, width = width))
                    .collect::<Vec<_>>()
                    .join(" | ")
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// ISO週の日付（月曜〜日曜）を取得
///
/// `week`が正の値なら今年のISO週番号、0以下なら今週からの相対週。
pub fn week_dates(today: NaiveDate, week: i8) -> Result<Vec<NaiveDate>, StatusError> {
    let monday = if week > 0 {
        NaiveDate::from_isoywd_opt(today.iso_week().year(), u32::from(week.unsigned_abs()), Weekday::Mon)
            .ok_or(StatusError::InvalidWeek(week))?
    } else {
        let this_monday =
            today - TimeDelta::days(i64::from(today.weekday().num_days_from_monday()));
        this_monday + TimeDelta::weeks(i64::from(week))
    };

    Ok(monday.iter_days().take(7).collect())
}

/// 時刻をHH:MM形式にフォーマット
fn format_time(time: Option<DateTime<FixedOffset>>) -> String {
    match time {
        Some(t) => t.format("%H:%M").to_string(),
        None => "-".to_string(),
    }
}

/// 経過時間を「○時間○分」形式にフォーマット
fn format_duration(duration: TimeDelta) -> String {
    let minutes = duration.num_minutes();
    let sign = if minutes < 0 { "-" } else { "" };
    let hours = minutes.abs() / 60;
    let minutes = minutes.abs() % 60;

    if hours > 0 {
        format!("{}{}時間{}分", sign, hours, minutes)
    } else {
        format!("{}{}分", sign, minutes)
    }
}

/// 経過時間をH:MM形式にフォーマット
fn format_hours(duration: TimeDelta) -> String {
    let minutes = duration.num_minutes();
    format!("{}:{:02}", minutes / 60, minutes % 60)
}
