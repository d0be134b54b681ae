//! OpenWeatherMap current conditions

use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::http::get_json;
use super::WeatherSource;

pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(client: Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current_weather(&self, latitude: f64, longitude: f64) -> Result<Value> {
        let Some(api_key) = self.api_key.as_deref() else {
            bail!("OPEN_WEATHER_API_KEY belum dikonfigurasi");
        };

        let request = self
            .client
            .get(format!("{}/data/2.5/weather", self.base_url))
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("appid", api_key.to_string()),
                ("units", "metric".to_string()),
                ("lang", "id".to_string()),
            ]);
        get_json(request, "OpenWeatherMap").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_current_weather_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/data/2.5/weather")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("lat".into(), "-6.2088".into()),
                Matcher::UrlEncoded("lon".into(), "106.8456".into()),
                Matcher::UrlEncoded("appid".into(), "owm-key".into()),
                Matcher::UrlEncoded("units".into(), "metric".into()),
                Matcher::UrlEncoded("lang".into(), "id".into()),
            ]))
            .with_status(200)
            .with_body(json!({"name": "Jakarta", "main": {"temp": 30.5}}).to_string())
            .create_async()
            .await;

        let weather =
            OpenWeatherClient::new(Client::new(), &server.url(), Some("owm-key".to_string()));
        let body = weather.current_weather(-6.2088, 106.8456).await.unwrap();

        mock.assert_async().await;
        assert_eq!(body["main"]["temp"], 30.5);
    }

    #[tokio::test]
    async fn test_missing_key_is_an_error() {
        let weather = OpenWeatherClient::new(Client::new(), "http://127.0.0.1:9", Some("  ".into()));
        let err = weather.current_weather(0.0, 0.0).await.unwrap_err();
        assert!(err.to_string().contains("OPEN_WEATHER_API_KEY"));
    }
}
