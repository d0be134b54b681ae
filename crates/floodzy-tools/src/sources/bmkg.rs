//! BMKG (Indonesian meteorology agency) latest earthquake feed

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::http::get_json;
use super::QuakeFeed;

const AUTOGEMPA_PATH: &str = "/DataMKG/TEWS/autogempa.json";

pub struct BmkgClient {
    client: Client,
    base_url: String,
}

impl BmkgClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl QuakeFeed for BmkgClient {
    async fn latest_quake(&self) -> Result<Value> {
        let url = format!("{}{}", self.base_url, AUTOGEMPA_PATH);
        let mut payload: Value = get_json(self.client.get(url), "BMKG").await?;

        // unwrap the {"Infogempa": {"gempa": {...}}} envelope
        match payload.pointer_mut("/Infogempa/gempa") {
            Some(gempa) => Ok(gempa.take()),
            None => Ok(payload),
        }
    }
}
