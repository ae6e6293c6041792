use crate::domain::model::MoodTag;
use crate::utils::error::{Result, TrackerError};
use chrono::{Days, Local, NaiveDate};
use std::collections::BTreeMap;

pub const DEFAULT_CYCLE_OFFSET_DAYS: u32 = 28;

/// toggle 之後發生了什麼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added(MoodTag),
    Removed(MoodTag),
    /// 使用者沒有選擇心情
    Unchanged,
}

/// 日期 → 心情標記。以 `NaiveDate` 為 key，排序即為日曆順序。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleLog {
    entries: BTreeMap<NaiveDate, MoodTag>,
}

impl CycleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &BTreeMap<NaiveDate, MoodTag> {
        &self.entries
    }

    pub fn get(&self, date: NaiveDate) -> Option<MoodTag> {
        self.entries.get(&date).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 已有記錄就移除；否則呼叫 `choose_mood` 讓使用者選擇，選了才寫入。
    pub fn toggle_entry<F>(&mut self, date: NaiveDate, choose_mood: F) -> ToggleOutcome
    where
        F: FnOnce() -> Option<MoodTag>,
    {
        if let Some(previous) = self.entries.remove(&date) {
            tracing::debug!("Removed mood {} on {}", previous, date);
            return ToggleOutcome::Removed(previous);
        }

        match choose_mood() {
            Some(tag) => {
                self.entries.insert(date, tag);
                tracing::debug!("Logged mood {} on {}", tag, date);
                ToggleOutcome::Added(tag)
            }
            None => ToggleOutcome::Unchanged,
        }
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.entries.keys().next_back().copied()
    }

    pub fn estimate_next_date(&self, offset_days: u32) -> NaiveDate {
        self.estimate_next_date_from(Local::now().date_naive(), offset_days)
    }

    /// `today` 只在沒有任何記錄時作為基準日
    pub fn estimate_next_date_from(&self, today: NaiveDate, offset_days: u32) -> NaiveDate {
        let base = self.latest_date().unwrap_or(today);
        base.checked_add_days(Days::new(u64::from(offset_days)))
            .unwrap_or(NaiveDate::MAX)
    }
}

/// 解析 `YYYY-MM-DD` 格式的日期 key
pub fn parse_date_key(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| TrackerError::parse(format!("Invalid date '{}': {}", value, e)))
}

pub fn format_estimate_label(date: NaiveDate) -> String {
    format!("🩸 Estimated next period on: {}", date.format("%d %B %Y"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_latest_date_across_year_boundary() {
        let mut log = CycleLog::new();
        log.toggle_entry(date(2025, 1, 5), || Some(MoodTag::Good));
        log.toggle_entry(date(2024, 12, 31), || Some(MoodTag::Low));

        assert_eq!(log.latest_date(), Some(date(2025, 1, 5)));
    }

    #[test]
    fn test_latest_date_is_chronological_not_lexical() {
        let mut log = CycleLog::new();
        for key in ["2025-01-09", "2025-01-10", "2024-12-31"] {
            let d = NaiveDate::parse_from_str(key, "%Y-%m-%d").unwrap();
            log.toggle_entry(d, || Some(MoodTag::Meh));
        }

        assert_eq!(log.latest_date(), Some(date(2025, 1, 10)));
    }

    #[test]
    fn test_latest_date_empty() {
        assert_eq!(CycleLog::new().latest_date(), None);
    }

    #[test]
    fn test_estimate_with_empty_log_uses_today() {
        let log = CycleLog::new();
        let today = Local::now().date_naive();
        assert_eq!(
            log.estimate_next_date(DEFAULT_CYCLE_OFFSET_DAYS),
            today + Days::new(28)
        );
        assert_eq!(
            log.estimate_next_date_from(date(2025, 2, 10), 28),
            date(2025, 3, 10)
        );
    }

    #[test]
    fn test_estimate_from_latest_entry() {
        let mut log = CycleLog::new();
        log.toggle_entry(date(2025, 3, 1), || Some(MoodTag::Good));

        assert_eq!(
            log.estimate_next_date_from(date(2030, 1, 1), DEFAULT_CYCLE_OFFSET_DAYS),
            date(2025, 3, 29)
        );
        assert_eq!(log.estimate_next_date_from(date(2030, 1, 1), 30), date(2025, 3, 31));
    }

    #[test]
    fn test_estimate_follows_log_mutations() {
        let mut log = CycleLog::new();
        let today = date(2025, 6, 1);
        log.toggle_entry(date(2025, 3, 1), || Some(MoodTag::Good));
        log.toggle_entry(date(2025, 4, 2), || Some(MoodTag::Awful));
        assert_eq!(log.estimate_next_date_from(today, 28), date(2025, 4, 30));

        log.toggle_entry(date(2025, 4, 2), || None);
        assert_eq!(log.estimate_next_date_from(today, 28), date(2025, 3, 29));
    }

    #[test]
    fn test_toggle_add_then_remove_restores_entries() {
        let mut log = CycleLog::new();
        log.toggle_entry(date(2025, 1, 1), || Some(MoodTag::Great));
        let before = log.clone();

        let added = log.toggle_entry(date(2025, 2, 14), || Some(MoodTag::Meh));
        assert_eq!(added, ToggleOutcome::Added(MoodTag::Meh));

        let removed = log.toggle_entry(date(2025, 2, 14), || panic!("should not prompt"));
        assert_eq!(removed, ToggleOutcome::Removed(MoodTag::Meh));
        assert_eq!(log, before);
    }

    #[test]
    fn test_toggle_without_choice_leaves_log_untouched() {
        let mut log = CycleLog::new();
        assert_eq!(
            log.toggle_entry(date(2025, 1, 1), || None),
            ToggleOutcome::Unchanged
        );
        assert!(log.is_empty());
    }

    #[test]
    fn test_parse_date_key() {
        assert_eq!(parse_date_key("2025-03-01").unwrap(), date(2025, 3, 1));
        assert!(parse_date_key("2025-02-30").is_err());
        assert!(parse_date_key("03/01/2025").is_err());
    }

    #[test]
    fn test_estimate_label() {
        assert_eq!(
            format_estimate_label(date(2025, 3, 29)),
            "🩸 Estimated next period on: 29 March 2025"
        );
    }
}
