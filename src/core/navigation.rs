#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Splash,
    Tracker,
    Doctors,
    Qa,
    Settings,
}

impl Screen {
    /// 底部分頁列的順序
    pub const TABS: [Screen; 4] = [Screen::Tracker, Screen::Doctors, Screen::Qa, Screen::Settings];

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Splash => "Welcome",
            Screen::Tracker => "🗓 Tracker",
            Screen::Doctors => "🩺 Doctors",
            Screen::Qa => "📖 Q&A",
            Screen::Settings => "⚙️ Settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    SplashElapsed,
    SelectTab(Screen),
}

/// 純狀態轉換，不涉及任何繪製
pub fn transition(current: Screen, event: NavEvent) -> Screen {
    match (current, event) {
        (Screen::Splash, NavEvent::SplashElapsed) => Screen::Tracker,
        (Screen::Splash, NavEvent::SelectTab(_)) => Screen::Splash,
        (_, NavEvent::SelectTab(Screen::Splash)) => current,
        (_, NavEvent::SelectTab(target)) => target,
        (_, NavEvent::SplashElapsed) => current,
    }
}

#[derive(Debug, Clone)]
pub struct Navigator {
    current: Screen,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            current: Screen::Splash,
        }
    }
}

impl Navigator {
    pub fn current(&self) -> Screen {
        self.current
    }

    /// 回傳 (離開的畫面, 新畫面)
    pub fn dispatch(&mut self, event: NavEvent) -> (Screen, Screen) {
        let previous = self.current;
        self.current = transition(previous, event);
        if previous != self.current {
            tracing::debug!("Screen {:?} -> {:?}", previous, self.current);
        }
        (previous, self.current)
    }
}
