//! Open-Meteo forecast client

use super::WeatherProvider;
use crate::config::{ConfigurationError, WeatherProviderConfig};
use crate::error::ProviderError;
use crate::models::{EnvPayload, WeatherConditions};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,\
precipitation,weather_code,surface_pressure,wind_speed_10m";

/// Weather provider backed by the public Open-Meteo forecast API.
///
/// Issues a single GET per call; retries and caching live in the orchestrator.
#[derive(Debug, Clone)]
pub struct OpenMeteoWeatherProvider {
    client: Client,
    base_url: String,
}

impl OpenMeteoWeatherProvider {
    /// Build a client for `config.base_url`
    ///
    /// Rejects a base URL that is not http(s) and surfaces client construction
    /// failures as provider errors.
    pub fn new(config: &WeatherProviderConfig) -> crate::Result<Self> {
        if !(config.base_url.starts_with("http://") || config.base_url.starts_with("https://")) {
            return Err(ConfigurationError::invalid_value(
                "weather.base_url",
                config.base_url.clone(),
                "must be an http or https URL",
            )
            .into());
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(ProviderError::from)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoWeatherProvider {
    async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<EnvPayload, ProviderError> {
        debug!(latitude, longitude, "Requesting Open-Meteo forecast");

        let body = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_forecast(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: Option<f64>,
    relative_humidity_2m: Option<f64>,
    apparent_temperature: Option<f64>,
    precipitation: Option<f64>,
    weather_code: Option<u8>,
    surface_pressure: Option<f64>,
    wind_speed_10m: Option<f64>,
}

fn parse_forecast(body: &str) -> Result<EnvPayload, ProviderError> {
    let response: ForecastResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("undecodable forecast: {e}")))?;

    let current = response
        .current
        .ok_or_else(|| ProviderError::InvalidResponse("missing current block".to_string()))?;

    Ok(EnvPayload {
        weather: WeatherConditions {
            condition: current
                .weather_code
                .map(describe_weather_code)
                .unwrap_or("Unknown")
                .to_string(),
            temperature_c: current.temperature_2m,
            feels_like_c: current.apparent_temperature,
            humidity_percent: current.relative_humidity_2m,
            pressure_hpa: current.surface_pressure,
            wind_speed_kph: current.wind_speed_10m,
            precipitation_mm: current.precipitation,
        },
        air_quality: None,
        location: None,
    })
}

/// Condition text for a WMO weather interpretation code
pub fn describe_weather_code(code: u8) -> &'static str {
    match code {
        0 => "Clear",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Cloudy",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing drizzle",
        61 | 63 | 65 => "Rain",
        66 | 67 => "Freezing rain",
        71 | 73 | 75 => "Snow",
        77 => "Snow grains",
        80..=82 => "Rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => "Unknown",
    }
}
