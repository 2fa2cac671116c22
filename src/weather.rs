//! # Weather Forecast
//!
//! Fetches today's forecast from the OpenWeatherMap One Call 3.0 API and
//! reduces it to a [`WeatherSnapshot`]. Only the first daily entry is used;
//! minutely, hourly and alert blocks are excluded from the request.

use crate::config::WeatherConfig;
use crate::fetch::FetchError;
use crate::WeatherSnapshot;
use log::{debug, info};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct OneCallResponse {
    #[serde(default)]
    pub daily: Vec<DailyForecast>,
}

#[derive(Debug, Deserialize)]
pub struct DailyForecast {
    pub temp: DayValue,
    pub feels_like: DayValue,
    pub pressure: i64,
    pub humidity: i64,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
pub struct DayValue {
    pub day: f64,
}

#[derive(Debug, Deserialize)]
pub struct Condition {
    pub main: String,
    pub description: String,
    pub icon: String,
}

impl OneCallResponse {
    /// Snapshot of the first forecast day.
    pub fn into_snapshot(self) -> Result<WeatherSnapshot, FetchError> {
        let day = self
            .daily
            .into_iter()
            .next()
            .ok_or(FetchError::MissingData("daily forecast"))?;
        let condition = day
            .weather
            .into_iter()
            .next()
            .ok_or(FetchError::MissingData("weather condition"))?;

        Ok(WeatherSnapshot {
            temp: day.temp.day,
            feel: day.feels_like.day,
            pressure: day.pressure,
            humidity: day.humidity,
            main: condition.main,
            desc: condition.description,
            icon: condition.icon,
        })
    }
}

/// Fetch today's weather for the configured coordinates.
pub async fn fetch(
    client: &reqwest::Client,
    config: &WeatherConfig,
) -> Result<WeatherSnapshot, FetchError> {
    if config.api_key.is_empty() {
        return Err(FetchError::Credentials("weather.api_key is not set".to_string()));
    }

    let lat = config.lat.to_string();
    let lon = config.lon.to_string();
    debug!("Requesting forecast for {}, {}", lat, lon);
    let response: OneCallResponse = client
        .get(&config.endpoint)
        .query(&[
            ("units", "metric"),
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("appid", config.api_key.as_str()),
            ("exclude", "minutely,hourly,alerts"),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let snapshot = response.into_snapshot()?;
    info!("🌤️  Weather: {} ({:.1} °C)", snapshot.main, snapshot.temp);
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "lat": 51.51, "lon": -0.13, "timezone": "Europe/London",
        "current": {"dt": 1709539200, "temp": 9.2},
        "daily": [
            {
                "dt": 1709553600,
                "temp": {"day": 11.64, "min": 6.1, "max": 12.3, "night": 7.0, "eve": 9.9, "morn": 6.4},
                "feels_like": {"day": 10.85, "night": 5.2, "eve": 8.1, "morn": 4.3},
                "pressure": 1009,
                "humidity": 71,
                "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}]
            },
            {
                "dt": 1709640000,
                "temp": {"day": 8.0},
                "feels_like": {"day": 6.0},
                "pressure": 1020,
                "humidity": 60,
                "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}]
            }
        ]
    }"#;

    #[test]
    fn test_snapshot_from_first_day() {
        let response: OneCallResponse = serde_json::from_str(SAMPLE).unwrap();
        let snapshot = response.into_snapshot().unwrap();

        assert_eq!(snapshot.temp, 11.64);
        assert_eq!(snapshot.feel, 10.85);
        assert_eq!(snapshot.pressure, 1009);
        assert_eq!(snapshot.humidity, 71);
        assert_eq!(snapshot.main, "Rain");
        assert_eq!(snapshot.desc, "light rain");
        assert_eq!(snapshot.icon, "10d");
    }

    #[test]
    fn test_missing_daily_is_error() {
        let response: OneCallResponse = serde_json::from_str(r#"{"lat": 1.0}"#).unwrap();
        assert!(matches!(
            response.into_snapshot(),
            Err(FetchError::MissingData("daily forecast"))
        ));
    }

    #[test]
    fn test_missing_condition_is_error() {
        let json = r#"{"daily": [{"temp": {"day": 1.0}, "feels_like": {"day": 0.0},
                       "pressure": 1000, "humidity": 90, "weather": []}]}"#;
        let response: OneCallResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            response.into_snapshot(),
            Err(FetchError::MissingData("weather condition"))
        ));
    }

    #[tokio::test]
    async fn test_fetch_requires_api_key() {
        let client = reqwest::Client::new();
        let result = fetch(&client, &WeatherConfig::default()).await;
        assert!(matches!(result, Err(FetchError::Credentials(_))));
    }
}
