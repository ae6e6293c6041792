use crate::core::cycle_log::DEFAULT_CYCLE_OFFSET_DAYS;
use crate::utils::error::{Result, TrackerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn background_hex(&self) -> &'static str {
        match self {
            Theme::Light => "#FFB6C1",
            Theme::Dark => "#1C1C1C",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub dark_mode: bool,
    pub cycle_length_days: u32,
    pub notifications: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            cycle_length_days: DEFAULT_CYCLE_OFFSET_DAYS,
            notifications: true,
        }
    }
}

/// 週期長度輸入；必須是正整數
pub fn parse_cycle_length(input: &str) -> Result<u32> {
    let invalid = |reason: &str| TrackerError::Input {
        field: "cycle_length_days".to_string(),
        value: input.to_string(),
        reason: reason.to_string(),
    };

    let value: i64 = input
        .trim()
        .parse()
        .map_err(|_| invalid("not a whole number"))?;

    u32::try_from(value)
        .ok()
        .filter(|days| *days > 0)
        .ok_or_else(|| invalid("must be a positive number of days"))
}

impl Settings {
    pub fn theme(&self) -> Theme {
        if self.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn set_dark_mode(&mut self, enabled: bool) -> Theme {
        self.dark_mode = enabled;
        self.theme()
    }

    /// 無效輸入不拒絕，記 log 後回到預設值 28
    pub fn apply_cycle_length_input(&mut self, input: &str) -> u32 {
        self.cycle_length_days = match parse_cycle_length(input) {
            Ok(days) => days,
            Err(e) => {
                tracing::warn!("{}, falling back to {}", e, DEFAULT_CYCLE_OFFSET_DAYS);
                DEFAULT_CYCLE_OFFSET_DAYS
            }
        };
        self.cycle_length_days
    }

    /// 沒有持久化，只記錄目前的值
    pub fn save(&self) {
        tracing::info!(
            dark_mode = self.dark_mode,
            cycle_length_days = self.cycle_length_days,
            notifications = self.notifications,
            "🔧 Settings saved"
        );
    }
}
