//! Tool Registry
//!
//! The set of callable capabilities is closed: [`ToolName`] enumerates it,
//! declarations are derived from it, and the dispatcher matches on it
//! exhaustively. Adding a tool without a handler (or vice versa) does not
//! compile.

use floodzy_core::{Error, Parameter, ToolDeclaration, DEFAULT_LOCATION};
use lazy_static::lazy_static;
use std::fmt;
use std::str::FromStr;

use crate::sources::{HazardType, Timeframe};

/// Hazard applied when the model omits `hazardType`
pub const DEFAULT_HAZARD: HazardType = HazardType::Flood;

/// Timeframe applied when the model omits `timeframe`
pub const DEFAULT_TIMEFRAME: Timeframe = Timeframe::Day;

/// Argument names as advertised to the model
pub mod args {
    pub const HAZARD_TYPE: &str = "hazardType";
    pub const TIMEFRAME: &str = "timeframe";
    pub const QUERY: &str = "query";
    pub const LAT: &str = "lat";
    pub const LON: &str = "lon";
    pub const LOCATION_NAME: &str = "locationName";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    WaterLevel,
    PumpStatus,
    LatestQuake,
    DisasterReports,
    Geocode,
    Weather,
}

impl ToolName {
    pub const ALL: [ToolName; 6] = [
        ToolName::WaterLevel,
        ToolName::PumpStatus,
        ToolName::LatestQuake,
        ToolName::DisasterReports,
        ToolName::Geocode,
        ToolName::Weather,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::WaterLevel => "fetchWaterLevelData",
            ToolName::PumpStatus => "fetchPumpStatusData",
            ToolName::LatestQuake => "fetchBmkgLatestQuake",
            ToolName::DisasterReports => "fetchPetabencanaReports",
            ToolName::Geocode => "geocodeLocation",
            ToolName::Weather => "fetchWeatherData",
        }
    }

    fn declaration(self) -> ToolDeclaration {
        let (description, parameters) = match self {
            ToolName::WaterLevel => (
                "Mendapatkan data tinggi muka air dari pos-pos hidrologi.".to_string(),
                vec![],
            ),
            ToolName::PumpStatus => (
                "Mendapatkan status operasional pompa-pompa banjir.".to_string(),
                vec![],
            ),
            ToolName::LatestQuake => (
                "Mendapatkan informasi gempa bumi terkini dari BMKG.".to_string(),
                vec![],
            ),
            ToolName::DisasterReports => (
                "Mendapatkan laporan bencana (banjir, gempa, dll.) dari PetaBencana.id.".to_string(),
                vec![
                    Parameter::string(
                        args::HAZARD_TYPE,
                        format!(
                            "Jenis bencana (misal: 'flood', 'earthquake', 'haze', 'volcano'). Default '{}'.",
                            DEFAULT_HAZARD
                        ),
                    )
                    .one_of(HazardType::ALL.iter().map(|h| h.as_str())),
                    Parameter::string(
                        args::TIMEFRAME,
                        format!(
                            "Rentang waktu laporan (misal: '1h', '6h', '24h', '3d', '7d'). Default '{}'.",
                            DEFAULT_TIMEFRAME
                        ),
                    )
                    .one_of(Timeframe::ALL.iter().map(|t| t.as_str())),
                ],
            ),
            ToolName::Geocode => (
                "Mengubah nama lokasi (kota, kabupaten, kecamatan) menjadi koordinat Latitude dan \
                 Longitude. Gunakan ini jika Anda perlu koordinat spesifik untuk fungsi lain."
                    .to_string(),
                vec![Parameter::string(
                    args::QUERY,
                    "Nama lokasi yang ingin dicari koordinatnya (contoh: 'Tangerang', 'Surabaya').",
                )
                .required()],
            ),
            ToolName::Weather => (
                format!(
                    "Mendapatkan kondisi cuaca saat ini untuk lokasi tertentu. Jika 'locationName' \
                     diberikan (misal: 'Bandung', 'Surabaya', 'Jakarta'), sistem akan otomatis mencari \
                     koordinatnya. Jika 'lat' dan 'lon' diberikan, gunakan itu. Jika tidak ada lokasi \
                     spesifik, akan menggunakan lokasi default ({}). Contoh penggunaan: \
                     '{tool}({name}: \"Tangerang\")' atau '{tool}({lat}: -6.2, {lon}: 106.8)'",
                    DEFAULT_LOCATION.name,
                    tool = ToolName::Weather,
                    name = args::LOCATION_NAME,
                    lat = args::LAT,
                    lon = args::LON,
                ),
                vec![
                    Parameter::number(args::LAT, "Latitude lokasi."),
                    Parameter::number(args::LON, "Longitude lokasi."),
                    Parameter::string(
                        args::LOCATION_NAME,
                        "Nama lokasi yang disebutkan pengguna (misal: 'Bandung', 'Surabaya', 'Jakarta').",
                    ),
                ],
            ),
        };

        ToolDeclaration {
            name: self.as_str().to_string(),
            description,
            parameters,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::not_found(format!("tool '{}'", s)))
    }
}

lazy_static! {
    static ref DECLARATIONS: Vec<ToolDeclaration> =
        ToolName::ALL.iter().map(|t| t.declaration()).collect();
}

/// Process-wide, immutable view of the declared tools
pub struct ToolRegistry;

impl ToolRegistry {
    /// All declarations, in a stable order
    pub fn list() -> &'static [ToolDeclaration] {
        &DECLARATIONS
    }

    /// Declaration for one tool name
    pub fn get(name: &str) -> Option<&'static ToolDeclaration> {
        DECLARATIONS.iter().find(|d| d.name == name)
    }
}
