//! Posko Banjir (Jakarta flood command post) water level and pump feeds

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::http::get_json;
use super::HydrologySource;

pub struct PoskoBanjirClient {
    client: Client,
    water_level_url: String,
    pump_status_url: String,
}

impl PoskoBanjirClient {
    pub fn new(client: Client, water_level_url: &str, pump_status_url: &str) -> Self {
        Self {
            client,
            water_level_url: water_level_url.to_string(),
            pump_status_url: pump_status_url.to_string(),
        }
    }
}

#[async_trait]
impl HydrologySource for PoskoBanjirClient {
    async fn water_levels(&self) -> Result<Value> {
        get_json(self.client.get(&self.water_level_url), "Data tinggi muka air").await
    }

    async fn pump_status(&self) -> Result<Value> {
        get_json(self.client.get(&self.pump_status_url), "Data status pompa").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_water_levels_and_pump_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tma.json")
            .with_status(200)
            .with_body(json!([{"NAMA_PINTU_AIR": "Manggarai", "TINGGI_AIR": 750}]).to_string())
            .create_async()
            .await;
        server
            .mock("GET", "/pompa.json")
            .with_status(502)
            .create_async()
            .await;

        let client = PoskoBanjirClient::new(
            Client::new(),
            &format!("{}/tma.json", server.url()),
            &format!("{}/pompa.json", server.url()),
        );

        let levels = client.water_levels().await.unwrap();
        assert_eq!(levels[0]["NAMA_PINTU_AIR"], "Manggarai");

        let err = client.pump_status().await.unwrap_err();
        assert!(err.to_string().contains("502"));
    }
}
