use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::GeoConfig;
use crate::error::{AppError, AppResult};

/// A province or regency (kabupaten/kota) from the public region API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Region {
    #[schema(example = "32")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province_id: Option<String>,
    #[schema(example = "JAWA BARAT")]
    pub name: String,
}

/// Province ids are plain digits; anything else would build a different URL.
pub fn validate_province_id(id: &str) -> AppResult<()> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::ValidationError(format!(
            "Invalid province id: {id}"
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct GeoService {
    http: Client,
    base_url: String,
}

impl GeoService {
    pub fn new(cfg: &GeoConfig) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent("leads-dashboard/geo")
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn provinces(&self) -> AppResult<Vec<Region>> {
        self.fetch("/provinces.json").await
    }

    pub async fn regencies(&self, province_id: &str) -> AppResult<Vec<Region>> {
        validate_province_id(province_id)?;
        self.fetch(&format!("/regencies/{province_id}.json")).await
    }

    async fn fetch(&self, path: &str) -> AppResult<Vec<Region>> {
        let url = format!("{}{path}", self.base_url);
        let resp = self.http.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            log::error!("Region API returned {status} for {url}");
            return Err(AppError::ExternalApiError(format!(
                "Region lookup failed with status {status}"
            )));
        }

        let regions: Vec<Region> = resp.json().await?;
        Ok(regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_province_id() {
        assert!(validate_province_id("32").is_ok());
        assert!(validate_province_id("").is_err());
        assert!(validate_province_id("32/../x").is_err());
        assert!(validate_province_id("3a").is_err());
    }

    #[test]
    fn test_region_parsing() {
        let provinces: Vec<Region> =
            serde_json::from_str(r#"[{"id":"11","name":"ACEH"},{"id":"32","name":"JAWA BARAT"}]"#)
                .unwrap();
        assert_eq!(provinces.len(), 2);
        assert!(provinces[0].province_id.is_none());

        let regencies: Vec<Region> = serde_json::from_str(
            r#"[{"id":"3273","province_id":"32","name":"KOTA BANDUNG"}]"#,
        )
        .unwrap();
        assert_eq!(regencies[0].province_id.as_deref(), Some("32"));
        assert_eq!(regencies[0].name, "KOTA BANDUNG");
    }

    #[tokio::test]
    async fn test_regencies_rejects_bad_id_without_request() {
        let geo = GeoService::new(&GeoConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        })
        .unwrap();
        assert!(matches!(
            geo.regencies("abc").await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_an_error() {
        let geo = GeoService::new(&GeoConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        })
        .unwrap();
        assert!(matches!(
            geo.provinces().await,
            Err(AppError::ReqwestError(_))
        ));
    }
}
