use crate::config::toml_config::{is_unset_secret, PlacesConfig};
use crate::domain::model::PlacesResponse;
use crate::domain::ports::{PlacesProvider, PlacesQuery};
use crate::utils::error::FetchError;
use async_trait::async_trait;
use reqwest::Client;

/// Geoapify places API client
pub struct GeoapifyClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeoapifyClient {
    pub fn new(config: &PlacesConfig) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        if is_unset_secret(&config.api_key) {
            tracing::warn!("⚠️ No places API key configured, requests will likely be rejected");
        }

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn query_params(&self, query: &PlacesQuery) -> Vec<(&'static str, String)> {
        let (lat, lon) = (query.center.lat, query.center.lon);
        vec![
            ("categories", query.category.clone()),
            (
                "filter",
                format!("circle:{},{},{}", lon, lat, query.radius_meters),
            ),
            ("bias", format!("proximity:{},{}", lon, lat)),
            ("limit", query.limit.to_string()),
            ("apiKey", self.api_key.clone()),
        ]
    }
}

#[async_trait]
impl PlacesProvider for GeoapifyClient {
    async fn fetch_places(&self, query: &PlacesQuery) -> Result<PlacesResponse, FetchError> {
        tracing::debug!(
            "Making places request to: {} (category={}, radius={}m)",
            self.endpoint,
            query.category,
            query.radius_meters
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&self.query_params(query))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Places response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let places: PlacesResponse = serde_json::from_slice(&bytes)?;
        tracing::info!("📍 Received {} places", places.features.len());
        Ok(places)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::LatLon;

    #[test]
    fn test_query_params_put_longitude_first() {
        let config = PlacesConfig {
            api_key: "test-key".to_string(),
            ..Default::default()
        };
        let client = GeoapifyClient::new(&config).unwrap();
        let query = PlacesQuery {
            center: LatLon::new(28.5355, 77.391),
            radius_meters: 50_000,
            category: "healthcare".to_string(),
            limit: 100,
        };

        let params = client.query_params(&query);
        assert!(params.contains(&("categories", "healthcare".to_string())));
        assert!(params.contains(&("filter", "circle:77.391,28.5355,50000".to_string())));
        assert!(params.contains(&("bias", "proximity:77.391,28.5355".to_string())));
        assert!(params.contains(&("limit", "100".to_string())));
        assert!(params.contains(&("apiKey", "test-key".to_string())));
    }
}
