use crate::adapters::{GeoapifyClient, OpenRouterClient};
use crate::config::TrackerConfig;
use crate::core::calendar::{month_grid, DayCell, MonthCursor};
use crate::core::clinic_feed::{ClinicFeed, ClinicLoader};
use crate::core::cycle_log::{format_estimate_label, CycleLog, ToggleOutcome};
use crate::core::lifetime::ScreenLifetime;
use crate::core::navigation::{NavEvent, Navigator, Screen};
use crate::core::qa::{PendingAnswer, QaState};
use crate::core::settings::{Settings, Theme};
use crate::domain::model::{ClinicRecord, MoodTag};
use crate::domain::ports::{ChatProvider, PlacesProvider};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use chrono::{Local, NaiveDate};
use std::sync::Arc;

/// 一次 app session 的所有狀態，明確傳給各畫面使用
pub struct AppSession {
    settings: Settings,
    log: CycleLog,
    cursor: MonthCursor,
    navigator: Navigator,
    screen_lifetime: ScreenLifetime,
    qa: QaState,
    pending_answer: Option<PendingAnswer>,
    clinic_feed: ClinicFeed,
    chat: Arc<dyn ChatProvider>,
}

impl AppSession {
    /// 必須在 tokio runtime 內呼叫：places 資料會立刻在背景開始抓取
    pub fn start(
        config: &TrackerConfig,
        places: Arc<dyn PlacesProvider>,
        chat: Arc<dyn ChatProvider>,
    ) -> Self {
        let clinic_feed =
            ClinicFeed::spawn(places, config.places.query(), config.feed.poll_interval());

        let settings = Settings {
            cycle_length_days: config.cycle.offset_days,
            ..Settings::default()
        };

        tracing::info!("Session started");
        Self {
            settings,
            log: CycleLog::new(),
            cursor: MonthCursor::current(),
            navigator: Navigator::default(),
            screen_lifetime: ScreenLifetime::new(),
            qa: QaState::new(),
            pending_answer: None,
            clinic_feed,
            chat,
        }
    }

    pub fn from_config(config: &TrackerConfig) -> Result<Self> {
        config.validate()?;
        let places = Arc::new(GeoapifyClient::new(&config.places)?);
        let chat = Arc::new(OpenRouterClient::new(&config.chat)?);
        Ok(Self::start(config, places, chat))
    }

    // ----- navigation -----

    pub fn current_screen(&self) -> Screen {
        self.navigator.current()
    }

    /// 切換畫面時拆除舊畫面：等待中的 clinic 載入與 chat 請求都會被取消
    pub fn navigate(&mut self, event: NavEvent) -> Screen {
        let (previous, current) = self.navigator.dispatch(event);
        if previous != current {
            self.screen_lifetime.tear_down();
            self.screen_lifetime = ScreenLifetime::new();

            if previous == Screen::Qa && self.pending_answer.take().is_some() {
                tracing::debug!("Dropped in-flight chat request");
                self.qa.set_answer("");
            }
        }
        current
    }

    // ----- tracker -----

    pub fn cycle_log(&self) -> &CycleLog {
        &self.log
    }

    pub fn month(&self) -> MonthCursor {
        self.cursor
    }

    pub fn prev_month(&mut self) -> MonthCursor {
        self.cursor = self.cursor.prev_month();
        self.cursor
    }

    pub fn next_month(&mut self) -> MonthCursor {
        self.cursor = self.cursor.next_month();
        self.cursor
    }

    /// 點選目前月份中的某一天；日期無效時回傳 None
    pub fn toggle_day<F>(&mut self, day: u32, choose_mood: F) -> Option<ToggleOutcome>
    where
        F: FnOnce() -> Option<MoodTag>,
    {
        let date = NaiveDate::from_ymd_opt(self.cursor.year(), self.cursor.month(), day)?;
        Some(self.log.toggle_entry(date, choose_mood))
    }

    pub fn toggle_date<F>(&mut self, date: NaiveDate, choose_mood: F) -> ToggleOutcome
    where
        F: FnOnce() -> Option<MoodTag>,
    {
        self.log.toggle_entry(date, choose_mood)
    }

    pub fn estimated_next_date(&self) -> NaiveDate {
        self.log.estimate_next_date(self.settings.cycle_length_days)
    }

    pub fn estimate_label(&self) -> String {
        format_estimate_label(self.estimated_next_date())
    }

    pub fn calendar_cells(&self) -> Vec<Option<DayCell>> {
        month_grid(self.cursor, &self.log, Local::now().date_naive())
    }

    // ----- doctors -----

    pub fn clinics_ready(&self) -> bool {
        self.clinic_feed.is_ready()
    }

    /// 綁定目前畫面的載入器；之後呼叫 `navigate` 會讓它回傳空清單
    pub fn clinic_loader(&self) -> ClinicLoader {
        self.clinic_feed.loader(self.screen_lifetime.signal())
    }

    /// 等到資料抵達或畫面被切走
    pub async fn load_clinics(&self) -> Vec<ClinicRecord> {
        self.clinic_loader().load().await
    }

    // ----- Q&A -----

    pub fn qa(&self) -> &QaState {
        &self.qa
    }

    pub fn qa_mut(&mut self) -> &mut QaState {
        &mut self.qa
    }

    /// 回傳 true 表示已送出請求
    pub fn ask(&mut self, question: &str) -> bool {
        self.pending_answer = self.qa.ask(Arc::clone(&self.chat), question);
        self.pending_answer.is_some()
    }

    pub async fn await_answer(&mut self) -> &str {
        if let Some(pending) = self.pending_answer.take() {
            self.qa.resolve(pending).await;
        }
        self.qa.answer()
    }

    // ----- settings -----

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn theme(&self) -> Theme {
        self.settings.theme()
    }
}
