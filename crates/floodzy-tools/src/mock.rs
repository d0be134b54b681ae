//! Recording fake data sources for tests
//!
//! One [`MockSources`] implements every source trait, keeps a log of the
//! calls it received, and can be told to fail per capability.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use floodzy_core::GeocodeCandidate;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::sources::{
    DataSources, DisasterReportSource, Geocoder, HazardType, HydrologySource, QuakeFeed, Timeframe,
    WeatherSource,
};

/// One upstream call as observed by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum SourceCall {
    WaterLevels,
    PumpStatus,
    LatestQuake,
    Reports {
        hazard: HazardType,
        timeframe: Timeframe,
    },
    Geocode {
        query: String,
    },
    Weather {
        latitude: f64,
        longitude: f64,
    },
}

impl SourceCall {
    pub fn capability(&self) -> Capability {
        match self {
            SourceCall::WaterLevels => Capability::WaterLevels,
            SourceCall::PumpStatus => Capability::PumpStatus,
            SourceCall::LatestQuake => Capability::LatestQuake,
            SourceCall::Reports { .. } => Capability::Reports,
            SourceCall::Geocode { .. } => Capability::Geocode,
            SourceCall::Weather { .. } => Capability::Weather,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    WaterLevels,
    PumpStatus,
    LatestQuake,
    Reports,
    Geocode,
    Weather,
}

#[derive(Default)]
struct State {
    calls: Vec<SourceCall>,
    places: HashMap<String, Vec<GeocodeCandidate>>,
    failures: HashMap<Capability, String>,
}

#[derive(Clone, Default)]
pub struct MockSources {
    state: Arc<Mutex<State>>,
}

impl MockSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Geocoder answer for a query (matched case-insensitively)
    pub fn with_place(self, query: &str, candidates: Vec<GeocodeCandidate>) -> Self {
        self.lock().places.insert(query.to_lowercase(), candidates);
        self
    }

    pub fn failing(self, capability: Capability, message: &str) -> Self {
        self.lock().failures.insert(capability, message.to_string());
        self
    }

    /// Every source slot backed by this mock
    pub fn data_sources(&self) -> DataSources {
        DataSources {
            hydrology: Arc::new(self.clone()),
            quakes: Arc::new(self.clone()),
            reports: Arc::new(self.clone()),
            geocoder: Arc::new(self.clone()),
            weather: Arc::new(self.clone()),
        }
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.lock().calls.clone()
    }

    pub fn count(&self, capability: Capability) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.capability() == capability)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // a test that panicked mid-call still leaves a usable log
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: SourceCall) -> Result<()> {
        let mut state = self.lock();
        let capability = call.capability();
        state.calls.push(call);
        match state.failures.get(&capability) {
            Some(message) => Err(anyhow!("{}", message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl HydrologySource for MockSources {
    async fn water_levels(&self) -> Result<Value> {
        self.record(SourceCall::WaterLevels)?;
        Ok(json!([{"NAMA_PINTU_AIR": "Manggarai", "TINGGI_AIR": 750, "STATUS_SIAGA": "Siaga 3"}]))
    }

    async fn pump_status(&self) -> Result<Value> {
        self.record(SourceCall::PumpStatus)?;
        Ok(json!([{"NAMA_POMPA": "Pluit", "STATUS": "Beroperasi"}]))
    }
}

#[async_trait]
impl QuakeFeed for MockSources {
    async fn latest_quake(&self) -> Result<Value> {
        self.record(SourceCall::LatestQuake)?;
        Ok(json!({"Magnitude": "5.1", "Wilayah": "Pusat gempa di laut 20 km BaratDaya Sukabumi"}))
    }
}

#[async_trait]
impl DisasterReportSource for MockSources {
    async fn reports(&self, hazard: HazardType, timeframe: Timeframe) -> Result<Value> {
        self.record(SourceCall::Reports { hazard, timeframe })?;
        Ok(json!({"result": {"type": "FeatureCollection", "features": []}}))
    }
}

#[async_trait]
impl Geocoder for MockSources {
    async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>> {
        self.record(SourceCall::Geocode {
            query: query.to_string(),
        })?;
        Ok(self
            .lock()
            .places
            .get(&query.to_lowercase())
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl WeatherSource for MockSources {
    async fn current_weather(&self, latitude: f64, longitude: f64) -> Result<Value> {
        self.record(SourceCall::Weather {
            latitude,
            longitude,
        })?;
        Ok(json!({
            "coord": {"lat": latitude, "lon": longitude},
            "weather": [{"description": "hujan ringan"}],
            "main": {"temp": 27.4, "humidity": 88}
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_and_fails_per_capability() {
        let mock = MockSources::new().failing(Capability::PumpStatus, "pompa offline");
        let sources = mock.data_sources();

        tokio_test::block_on(async {
            tokio_test::assert_ok!(sources.hydrology.water_levels().await);
            let err = tokio_test::assert_err!(sources.hydrology.pump_status().await);
            assert_eq!(err.to_string(), "pompa offline");
        });

        assert_eq!(mock.count(Capability::WaterLevels), 1);
        assert_eq!(mock.count(Capability::PumpStatus), 1);
        assert_eq!(mock.calls().len(), 2);
    }
}
