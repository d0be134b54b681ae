//! OpenStreetMap Nominatim geocoder

use anyhow::Result;
use async_trait::async_trait;
use floodzy_core::GeocodeCandidate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::http::get_json;
use super::Geocoder;

const SEARCH_LIMIT: &str = "5";

/// Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

impl Place {
    fn into_candidate(self) -> Option<GeocodeCandidate> {
        let latitude = self.lat.trim().parse::<f64>().ok()?;
        let longitude = self.lon.trim().parse::<f64>().ok()?;
        GeocodeCandidate::new(latitude, longitude, self.display_name)
    }
}

pub struct NominatimClient {
    client: Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>> {
        let request = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", query), ("format", "json"), ("limit", SEARCH_LIMIT)]);
        let places: Vec<Place> = get_json(request, "Nominatim").await?;

        let total = places.len();
        let candidates: Vec<GeocodeCandidate> =
            places.into_iter().filter_map(Place::into_candidate).collect();
        if candidates.len() < total {
            warn!(
                "Discarded {} invalid geocoder candidate(s) for '{}'",
                total - candidates.len(),
                query
            );
        }
        debug!("Geocoder returned {} candidate(s) for '{}'", candidates.len(), query);

        Ok(candidates)
    }
}
