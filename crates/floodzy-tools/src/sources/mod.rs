//! Upstream data sources
//!
//! Each capability is an opaque async call behind a trait so the dispatcher
//! can be exercised against fakes. The HTTP implementations share one
//! `reqwest` client built from [`Settings`].

use anyhow::Result;
use async_trait::async_trait;
use floodzy_core::{GeocodeCandidate, Settings};
use serde_json::Value;
use std::sync::Arc;

pub mod bmkg;
pub mod http;
pub mod hydrology;
pub mod nominatim;
pub mod openweather;
pub mod petabencana;

pub use bmkg::BmkgClient;
pub use hydrology::PoskoBanjirClient;
pub use nominatim::NominatimClient;
pub use openweather::OpenWeatherClient;
pub use petabencana::{HazardType, PetaBencanaClient, Timeframe};

/// Water level sensors and flood pump telemetry
#[async_trait]
pub trait HydrologySource: Send + Sync {
    async fn water_levels(&self) -> Result<Value>;

    async fn pump_status(&self) -> Result<Value>;
}

/// Earthquake feed
#[async_trait]
pub trait QuakeFeed: Send + Sync {
    async fn latest_quake(&self) -> Result<Value>;
}

/// Citizen disaster reports
#[async_trait]
pub trait DisasterReportSource: Send + Sync {
    async fn reports(&self, hazard: HazardType, timeframe: Timeframe) -> Result<Value>;
}

/// Place-name search. "Not found" is an empty list, not an error.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Candidates ranked by confidence, highest first
    async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>>;
}

/// Current conditions by coordinate
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current_weather(&self, latitude: f64, longitude: f64) -> Result<Value>;
}

/// The full set of collaborators the dispatcher needs
#[derive(Clone)]
pub struct DataSources {
    pub hydrology: Arc<dyn HydrologySource>,
    pub quakes: Arc<dyn QuakeFeed>,
    pub reports: Arc<dyn DisasterReportSource>,
    pub geocoder: Arc<dyn Geocoder>,
    pub weather: Arc<dyn WeatherSource>,
}

impl DataSources {
    /// Build the HTTP-backed sources
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = http::build_client(settings.http_timeout)?;

        Ok(Self {
            hydrology: Arc::new(PoskoBanjirClient::new(
                client.clone(),
                &settings.water_level_url,
                &settings.pump_status_url,
            )),
            quakes: Arc::new(BmkgClient::new(client.clone(), &settings.bmkg_base_url)),
            reports: Arc::new(PetaBencanaClient::new(client.clone(), &settings.petabencana_base_url)),
            geocoder: Arc::new(NominatimClient::new(client.clone(), &settings.nominatim_base_url)),
            weather: Arc::new(OpenWeatherClient::new(
                client,
                &settings.open_weather_base_url,
                settings.open_weather_api_key.clone(),
            )),
        })
    }
}
