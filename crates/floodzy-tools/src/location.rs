//! Location resolution for coordinate-based tools
//!
//! A resolution never dead-ends: explicit coordinates win, then a geocoded
//! place name, then the process-wide default location.

use floodzy_core::{
    valid_coordinates, DefaultLocation, LocationSource, ResolvedLocation, DEFAULT_LOCATION,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::sources::Geocoder;

pub struct LocationResolver {
    geocoder: Arc<dyn Geocoder>,
    default: DefaultLocation,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            geocoder,
            default: DEFAULT_LOCATION,
        }
    }

    pub fn with_default(mut self, default: DefaultLocation) -> Self {
        self.default = default;
        self
    }

    pub fn default_location(&self) -> &DefaultLocation {
        &self.default
    }

    /// Resolve whatever subset of name and coordinates the caller supplied.
    ///
    /// Makes at most one geocoder call, and only when no usable coordinate
    /// pair was given.
    pub async fn resolve(
        &self,
        name: Option<&str>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> ResolvedLocation {
        let name = name.map(str::trim).filter(|n| !n.is_empty());

        if let (Some(lat), Some(lon)) = (latitude, longitude) {
            if valid_coordinates(lat, lon) {
                debug!("Using explicit coordinates ({}, {})", lat, lon);
                return ResolvedLocation {
                    latitude: lat,
                    longitude: lon,
                    label: name.map(str::to_string),
                    warning: None,
                    source: LocationSource::Explicit,
                };
            }
            warn!("Ignoring out-of-range coordinates ({}, {})", lat, lon);
        }

        let Some(name) = name else {
            debug!("No location given, using {}", self.default.name);
            return self.default.resolved(None);
        };

        match self.geocoder.search(name).await {
            Ok(candidates) => {
                if let Some(best) = candidates.into_iter().find(|c| c.is_valid()) {
                    info!(
                        "Geocoded '{}' to ({}, {}) [{}]",
                        name, best.latitude, best.longitude, best.display_name
                    );
                    return ResolvedLocation {
                        latitude: best.latitude,
                        longitude: best.longitude,
                        label: Some(name.to_string()),
                        warning: None,
                        source: LocationSource::Geocoded,
                    };
                }
                warn!("No geocoder match for '{}'", name);
            }
            Err(e) => warn!("Geocoder failed for '{}': {:#}", name, e),
        }

        self.default.resolved(Some(format!(
            "Tidak dapat menemukan lokasi '{}'. Menampilkan cuaca {}.",
            name, self.default.name
        )))
    }
}
