//! PetaBencana.id citizen disaster reports

use anyhow::Result;
use async_trait::async_trait;
use floodzy_core::Error;
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::http::get_json;
use super::DisasterReportSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HazardType {
    Flood,
    Earthquake,
    Haze,
    Volcano,
    Wind,
    Fire,
    Landslide,
}

impl HazardType {
    pub const ALL: [HazardType; 7] = [
        HazardType::Flood,
        HazardType::Earthquake,
        HazardType::Haze,
        HazardType::Volcano,
        HazardType::Wind,
        HazardType::Fire,
        HazardType::Landslide,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HazardType::Flood => "flood",
            HazardType::Earthquake => "earthquake",
            HazardType::Haze => "haze",
            HazardType::Volcano => "volcano",
            HazardType::Wind => "wind",
            HazardType::Fire => "fire",
            HazardType::Landslide => "landslide",
        }
    }
}

impl fmt::Display for HazardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HazardType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        HazardType::ALL
            .into_iter()
            .find(|h| h.as_str() == wanted)
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "hazardType '{}' tidak dikenal (pilihan: {})",
                    s,
                    HazardType::ALL.map(HazardType::as_str).join(", ")
                ))
            })
    }
}

/// Reporting window accepted by the reports API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeframe {
    Hour,
    SixHours,
    Day,
    ThreeDays,
    Week,
}

impl Timeframe {
    pub const ALL: [Timeframe; 5] = [
        Timeframe::Hour,
        Timeframe::SixHours,
        Timeframe::Day,
        Timeframe::ThreeDays,
        Timeframe::Week,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::Hour => "1h",
            Timeframe::SixHours => "6h",
            Timeframe::Day => "24h",
            Timeframe::ThreeDays => "3d",
            Timeframe::Week => "7d",
        }
    }

    /// `timeperiod` query value; the API caps it at one week
    pub fn as_seconds(self) -> u32 {
        match self {
            Timeframe::Hour => 3_600,
            Timeframe::SixHours => 21_600,
            Timeframe::Day => 86_400,
            Timeframe::ThreeDays => 259_200,
            Timeframe::Week => 604_800,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Timeframe::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "timeframe '{}' tidak dikenal (pilihan: {})",
                    s,
                    Timeframe::ALL.map(Timeframe::as_str).join(", ")
                ))
            })
    }
}

pub struct PetaBencanaClient {
    client: Client,
    base_url: String,
}

impl PetaBencanaClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl DisasterReportSource for PetaBencanaClient {
    async fn reports(&self, hazard: HazardType, timeframe: Timeframe) -> Result<Value> {
        let request = self
            .client
            .get(format!("{}/reports", self.base_url))
            .query(&[
                ("disaster", hazard.as_str().to_string()),
                ("timeperiod", timeframe.as_seconds().to_string()),
            ]);
        get_json(request, "PetaBencana").await
    }
}
