//! Tool Dispatcher
//!
//! Maps a model function call onto one data source. Every path yields a
//! [`ToolResult`]; collaborator failures are turned into `Err` results so the
//! conversation can continue.

use anyhow::Result;
use floodzy_core::{FunctionCallRequest, ResolvedLocation, ToolResult};
use serde_json::{json, Value};
use std::str::FromStr;
use tracing::{info, warn};

use crate::location::LocationResolver;
use crate::registry::{args, ToolName, DEFAULT_HAZARD, DEFAULT_TIMEFRAME};
use crate::sources::DataSources;

pub struct ToolDispatcher {
    sources: DataSources,
    resolver: LocationResolver,
}

impl ToolDispatcher {
    pub fn new(sources: DataSources) -> Self {
        let resolver = LocationResolver::new(sources.geocoder.clone());
        Self { sources, resolver }
    }

    pub fn with_resolver(sources: DataSources, resolver: LocationResolver) -> Self {
        Self { sources, resolver }
    }

    /// Execute one function call
    pub async fn invoke(&self, call: &FunctionCallRequest) -> ToolResult {
        let tool = match ToolName::from_str(&call.name) {
            Ok(tool) => tool,
            Err(_) => {
                warn!("Model requested unknown function '{}'", call.name);
                return ToolResult::err(format!("Fungsi tidak dikenal: {}", call.name));
            }
        };

        info!("Invoking tool {} with {} argument(s)", tool, call.arguments.len());

        let result = match tool {
            ToolName::WaterLevel => from_source(self.sources.hydrology.water_levels().await),
            ToolName::PumpStatus => from_source(self.sources.hydrology.pump_status().await),
            ToolName::LatestQuake => from_source(self.sources.quakes.latest_quake().await),
            ToolName::DisasterReports => self.disaster_reports(call).await,
            ToolName::Geocode => self.geocode(call).await,
            ToolName::Weather => self.weather(call).await,
        };

        match &result {
            ToolResult::Ok(_) => info!("Tool {} succeeded", tool),
            ToolResult::Err { message } => warn!("Tool {} failed: {}", tool, message),
        }
        result
    }

    async fn disaster_reports(&self, call: &FunctionCallRequest) -> ToolResult {
        let hazard = match parse_or(call, args::HAZARD_TYPE, DEFAULT_HAZARD) {
            Ok(h) => h,
            Err(e) => return ToolResult::err(e.to_string()),
        };
        let timeframe = match parse_or(call, args::TIMEFRAME, DEFAULT_TIMEFRAME) {
            Ok(t) => t,
            Err(e) => return ToolResult::err(e.to_string()),
        };

        from_source(self.sources.reports.reports(hazard, timeframe).await)
    }

    async fn geocode(&self, call: &FunctionCallRequest) -> ToolResult {
        let Some(query) = call.str_arg(args::QUERY) else {
            return ToolResult::err(format!(
                "Parameter '{}' wajib diisi untuk {}.",
                args::QUERY,
                ToolName::Geocode
            ));
        };

        match self.sources.geocoder.search(query).await {
            Ok(candidates) => match candidates.into_iter().find(|c| c.is_valid()) {
                Some(best) => ToolResult::Ok(json!(best)),
                None => ToolResult::err(format!(
                    "Tidak dapat menemukan koordinat untuk '{}'.",
                    query
                )),
            },
            Err(e) => ToolResult::err(format!("{:#}", e)),
        }
    }

    async fn weather(&self, call: &FunctionCallRequest) -> ToolResult {
        let location = self
            .resolver
            .resolve(
                call.str_arg(args::LOCATION_NAME),
                call.number_arg(args::LAT),
                call.number_arg(args::LON),
            )
            .await;

        match self
            .sources
            .weather
            .current_weather(location.latitude, location.longitude)
            .await
        {
            Ok(payload) => ToolResult::Ok(annotate(payload, &location)),
            Err(e) => {
                let place = location
                    .label
                    .clone()
                    .unwrap_or_else(|| format!("{}, {}", location.latitude, location.longitude));
                ToolResult::err(format!("Gagal mengambil data cuaca untuk {}: {:#}", place, e))
            }
        }
    }
}

fn from_source(outcome: Result<Value>) -> ToolResult {
    match outcome {
        Ok(payload) => ToolResult::Ok(payload),
        Err(e) => ToolResult::err(format!("{:#}", e)),
    }
}

/// Optional enum argument; absent means `default`, unrecognised is an error
fn parse_or<T>(call: &FunctionCallRequest, key: &str, default: T) -> Result<T, T::Err>
where
    T: FromStr,
{
    match call.str_arg(key) {
        Some(raw) => raw.parse(),
        None => Ok(default),
    }
}

/// Attach the resolved place so the model can name it
fn annotate(payload: Value, location: &ResolvedLocation) -> Value {
    let mut object = match payload {
        Value::Object(map) => map,
        other => {
            let mut map = serde_json::Map::new();
            map.insert("result".to_string(), other);
            map
        }
    };
    if let Some(label) = &location.label {
        object.insert(args::LOCATION_NAME.to_string(), json!(label));
    }
    if let Some(warning) = &location.warning {
        object.insert("warning".to_string(), json!(warning));
    }
    Value::Object(object)
}
