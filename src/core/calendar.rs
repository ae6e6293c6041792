use crate::core::cycle_log::CycleLog;
use crate::domain::model::MoodTag;
use chrono::{Datelike, Local, NaiveDate};

pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// 目前顯示的月份
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    /// `month` 超出 1..=12 時回傳 None
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn prev_month(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next_month(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn days_in_month(&self) -> u32 {
        let next = self.next_month();
        let first_of_next = NaiveDate::from_ymd_opt(next.year, next.month, 1);
        match first_of_next {
            Some(d) => d.signed_duration_since(self.first_day()).num_days() as u32,
            None => 31,
        }
    }

    /// 例如 "March 2025"
    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub mood: Option<MoodTag>,
    pub is_today: bool,
}

impl DayCell {
    pub fn text(&self) -> String {
        match self.mood {
            Some(mood) => format!("{}\n{}", self.date.day(), mood),
            None => self.date.day().to_string(),
        }
    }
}

/// 月曆格子，`None` 是補齊整週用的空白格
pub fn month_grid(cursor: MonthCursor, log: &CycleLog, today: NaiveDate) -> Vec<Option<DayCell>> {
    let first = cursor.first_day();
    let leading = first.weekday().num_days_from_sunday() as usize;
    let days = cursor.days_in_month();

    let mut cells: Vec<Option<DayCell>> = vec![None; leading];
    cells.extend((0..days).filter_map(|offset| {
        let date = first.checked_add_days(chrono::Days::new(u64::from(offset)))?;
        Some(Some(DayCell {
            date,
            mood: log.get(date),
            is_today: date == today,
        }))
    }));

    while cells.len() % 7 != 0 {
        cells.push(None);
    }
    cells
}

/// 純文字月曆，CLI 使用
pub fn render_month(cursor: MonthCursor, log: &CycleLog, today: NaiveDate) -> String {
    let mut out = format!("{:^34}\n", cursor.label());
    out.push_str(
        &WEEKDAY_HEADERS
            .iter()
            .map(|h| format!("{:>4}", h))
            .collect::<String>(),
    );
    out.push('\n');

    for week in month_grid(cursor, log, today).chunks(7) {
        for cell in week {
            let text = match cell {
                None => String::new(),
                Some(c) => {
                    let marker = match (c.mood, c.is_today) {
                        (Some(_), _) => "*",
                        (None, true) => "^",
                        (None, false) => "",
                    };
                    format!("{}{}", c.date.day(), marker)
                }
            };
            out.push_str(&format!("{:>4}", text));
        }
        out.push('\n');
    }
    out
}
