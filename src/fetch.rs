//! Fetches today's degree days data from the Met Office Weather DataHub.
//!
//! One GET against the site-specific daily point forecast endpoint per
//! collection run; the caller decides whether to retry on a future schedule.

use std::time::Duration;

use log::info;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::reading::{DegreeDayReading, DegreeDays, DEFAULT_BASELINE_TEMP};

const BASE_URL: &str = "https://data.hub.api.metoffice.gov.uk/sitespecific/v0/point";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid coordinates format `{0}`. Use: latitude,longitude (e.g., 51.5074,-0.1278)")]
    InvalidCoordinates(String),

    #[error("Invalid API key. Please check your Met Office Weather DataHub API key.")]
    Auth,

    #[error("Location not found. Please check the coordinates.")]
    NotFound,

    #[error("Invalid request. Please check coordinates format (latitude,longitude).")]
    InvalidRequest,

    #[error("Met Office API error: {status} - {reason}")]
    Provider { status: u16, reason: String },

    #[error("No response from Met Office API. Please check your internet connection.")]
    Connectivity(#[source] reqwest::Error),

    #[error("{0}")]
    NoData(&'static str),

    #[error("Failed to build HTTP client")]
    Client(#[source] reqwest::Error),
}

/// Client for the Weather DataHub site-specific point forecast API.
#[derive(Debug, Clone)]
pub struct DataHubClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    baseline_temp: f64,
}

impl DataHubClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(FetchError::Client)?;

        Ok(DataHubClient {
            client,
            base_url: BASE_URL.to_string(),
            api_key: api_key.into(),
            baseline_temp: DEFAULT_BASELINE_TEMP,
        })
    }

    /// Overrides the degree days baseline temperature (°C).
    pub fn with_baseline(mut self, baseline_temp: f64) -> Self {
        self.baseline_temp = baseline_temp;
        self
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches today's forecast for `"latitude,longitude"` and derives the
    /// degree day reading from it.
    pub async fn degree_days(&self, coordinates: &str) -> Result<DegreeDayReading, FetchError> {
        let (latitude, longitude) = parse_coordinates(coordinates)?;

        info!("Requesting daily point forecast for {latitude},{longitude}");

        let url = format!("{}/daily", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("includeLocationName", "true".to_string()),
            ])
            .header("apikey", &self.api_key)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(FetchError::Connectivity)?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FetchError::Auth,
                StatusCode::NOT_FOUND => FetchError::NotFound,
                StatusCode::BAD_REQUEST => FetchError::InvalidRequest,
                _ => FetchError::Provider {
                    status: status.as_u16(),
                    reason: status.canonical_reason().unwrap_or("unknown").to_string(),
                },
            });
        }

        let forecast: PointForecast =
            response.json().await.map_err(|e| FetchError::Provider {
                status: status.as_u16(),
                reason: e.to_string(),
            })?;

        self.reading_from_forecast(latitude, longitude, forecast)
    }

    fn reading_from_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        forecast: PointForecast,
    ) -> Result<DegreeDayReading, FetchError> {
        let feature = forecast
            .features
            .into_iter()
            .next()
            .ok_or(FetchError::NoData("No data available for this location"))?;
        let properties = feature.properties;

        // Today is the first entry of the time-ordered series.
        let today = properties
            .time_series
            .into_iter()
            .next()
            .ok_or(FetchError::NoData("No forecast data available"))?;

        let max_temp = first_reading(&[
            today.day_max_screen_temperature,
            today.max_screen_air_temp,
        ]);
        let min_temp = first_reading(&[
            today.night_min_screen_temperature,
            today.min_screen_air_temp,
        ]);

        let degree_days = DegreeDays::derive(max_temp, min_temp, self.baseline_temp);

        let location_name = properties
            .location
            .and_then(|location| location.name)
            .unwrap_or_else(|| format!("{latitude}, {longitude}"));

        Ok(DegreeDayReading {
            date: today.time,
            location_id: format!("{latitude},{longitude}"),
            location_name,
            max_temp,
            min_temp,
            avg_temp: degree_days.avg_temp,
            baseline_temp: self.baseline_temp,
            heating_degree_days: degree_days.heating,
            cooling_degree_days: degree_days.cooling,
            weather_code: today.significant_weather_code,
            wind_speed: today.midday_wind_speed,
            wind_gust: today.midday_wind_gust,
            visibility: today.midday_visibility,
            humidity: today.midday_relative_humidity,
            uv_index: today.max_uv_index,
            precip_probability: today.day_probability_of_precipitation,
            collected_at: chrono::Utc::now(),
        })
    }
}

/// Parses `"latitude,longitude"` into a pair of finite decimal degrees.
fn parse_coordinates(coordinates: &str) -> Result<(f64, f64), FetchError> {
    let parts: Vec<&str> = coordinates.split(',').collect();
    if parts.len() != 2 {
        return Err(FetchError::InvalidCoordinates(coordinates.to_string()));
    }

    match (parse_finite(parts[0]), parse_finite(parts[1])) {
        (Some(latitude), Some(longitude)) => Ok((latitude, longitude)),
        _ => Err(FetchError::InvalidCoordinates(coordinates.to_string())),
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// DataHub has renamed fields across API generations; candidates are tried in
// order, newest name first.
fn first_reading(candidates: &[Option<f64>]) -> f64 {
    candidates.iter().flatten().next().copied().unwrap_or(0.0)
}

// -- Response models ---------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PointForecast {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: FeatureProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeatureProperties {
    location: Option<Location>,
    #[serde(default)]
    time_series: Vec<DailyEntry>,
}

#[derive(Debug, Deserialize)]
struct Location {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyEntry {
    time: String,
    day_max_screen_temperature: Option<f64>,
    max_screen_air_temp: Option<f64>,
    night_min_screen_temperature: Option<f64>,
    min_screen_air_temp: Option<f64>,
    significant_weather_code: Option<f64>,
    #[serde(rename = "midday10MWindSpeed")]
    midday_wind_speed: Option<f64>,
    #[serde(rename = "midday10MWindGust")]
    midday_wind_gust: Option<f64>,
    midday_visibility: Option<f64>,
    midday_relative_humidity: Option<f64>,
    max_uv_index: Option<f64>,
    day_probability_of_precipitation: Option<f64>,
}

// -- Tests -------------------------------------------------------------------
