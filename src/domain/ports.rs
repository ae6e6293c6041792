use crate::domain::model::{LatLon, PlacesResponse};
use crate::utils::error::{FetchError, Result};
use async_trait::async_trait;

/// 一次 places 搜尋的參數
#[derive(Debug, Clone, PartialEq)]
pub struct PlacesQuery {
    pub center: LatLon,
    pub radius_meters: u32,
    pub category: String,
    pub limit: u32,
}

#[async_trait]
pub trait PlacesProvider: Send + Sync {
    async fn fetch_places(&self, query: &PlacesQuery)
        -> std::result::Result<PlacesResponse, FetchError>;
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// 回傳助理回覆的純文字
    async fn complete(&self, question: &str) -> Result<String>;
}
