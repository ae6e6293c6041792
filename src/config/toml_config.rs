use crate::core::cycle_log::DEFAULT_CYCLE_OFFSET_DAYS;
use crate::domain::model::LatLon;
use crate::domain::ports::PlacesQuery;
use crate::utils::error::{Result, TrackerError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub places: PlacesConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub cycle: CycleConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    #[serde(default = "default_places_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_radius_meters")]
    pub radius_meters: u32,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_chat_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleConfig {
    #[serde(default = "default_offset_days")]
    pub offset_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// 等待 clinic 資料時印出進度的間隔
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_places_endpoint() -> String {
    "https://api.geoapify.com/v2/places".to_string()
}

fn default_latitude() -> f64 {
    28.5355
}

fn default_longitude() -> f64 {
    77.3910
}

fn default_radius_meters() -> u32 {
    50_000
}

fn default_category() -> String {
    "healthcare".to_string()
}

fn default_limit() -> u32 {
    100
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_chat_endpoint() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "mistralai/mixtral-8x7b-instruct".to_string()
}

fn default_system_prompt() -> String {
    "You are a friendly assistant that answers questions about menstruation in a helpful and respectful way.".to_string()
}

fn default_offset_days() -> u32 {
    DEFAULT_CYCLE_OFFSET_DAYS
}

fn default_poll_interval_ms() -> u64 {
    500
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            endpoint: default_places_endpoint(),
            api_key: String::new(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            radius_meters: default_radius_meters(),
            category: default_category(),
            limit: default_limit(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: default_chat_endpoint(),
            api_key: String::new(),
            model: default_model(),
            system_prompt: default_system_prompt(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            offset_days: default_offset_days(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl PlacesConfig {
    pub fn query(&self) -> PlacesQuery {
        PlacesQuery {
            center: LatLon::new(self.latitude, self.longitude),
            radius_meters: self.radius_meters,
            category: self.category.clone(),
            limit: self.limit,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl ChatConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl FeedConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// 空字串或未被替換的 `${VAR}` 都視為沒有設定
pub fn is_unset_secret(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || (trimmed.starts_with("${") && trimmed.ends_with('}'))
}

impl TrackerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded config from {:?}", path.as_ref());
        Ok(config)
    }

    /// 檔案不存在時使用預設值
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(path) if path.as_ref().exists() => Self::from_file(path),
            Some(path) => {
                tracing::info!(
                    "No config file found at {:?}, using defaults",
                    path.as_ref()
                );
                Self::from_toml_str("")
            }
            None => Self::from_toml_str(""),
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: TrackerConfig = toml::from_str(&processed_content)
            .map_err(|e| TrackerError::config(format!("TOML parsing error: {}", e)))?;

        // 沒寫在檔案裡的 key 直接從環境變數取
        if is_unset_secret(&config.places.api_key) {
            if let Ok(key) = std::env::var("GEOAPIFY_API_KEY") {
                config.places.api_key = key;
            }
        }
        if is_unset_secret(&config.chat.api_key) {
            if let Ok(key) = std::env::var("OPENROUTER_API_KEY") {
                config.chat.api_key = key;
            }
        }

        Ok(config)
    }

    /// 替換環境變數 (例如 ${GEOAPIFY_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| TrackerError::config(format!("Invalid env pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for TrackerConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("places.endpoint", &self.places.endpoint)?;
        validation::validate_range("places.latitude", self.places.latitude, -90.0, 90.0)?;
        validation::validate_range("places.longitude", self.places.longitude, -180.0, 180.0)?;
        validation::validate_range("places.radius_meters", self.places.radius_meters, 1, 500_000)?;
        validation::validate_non_empty_string("places.category", &self.places.category)?;
        validation::validate_range("places.limit", self.places.limit, 1, 500)?;
        validation::validate_range("places.timeout_seconds", self.places.timeout_seconds, 1, 120)?;

        validation::validate_url("chat.endpoint", &self.chat.endpoint)?;
        validation::validate_non_empty_string("chat.model", &self.chat.model)?;
        validation::validate_range("chat.timeout_seconds", self.chat.timeout_seconds, 1, 120)?;

        validation::validate_range("cycle.offset_days", self.cycle.offset_days, 1, 120)?;
        validation::validate_range("feed.poll_interval_ms", self.feed.poll_interval_ms, 10, 60_000)?;

        Ok(())
    }
}
