//! floodzy-tools: Tool Registry and Dispatch
//!
//! Provides the static tool declarations advertised to the model, the
//! upstream data sources behind them, location resolution, and the
//! dispatcher that turns a model function call into a [`ToolResult`].
//!
//! [`ToolResult`]: floodzy_core::ToolResult

pub mod dispatcher;
pub mod location;
pub mod mock;
pub mod registry;
pub mod sources;

// Re-export main types
pub use dispatcher::ToolDispatcher;
pub use location::LocationResolver;
pub use registry::{ToolName, ToolRegistry};
pub use sources::{
    DataSources, DisasterReportSource, Geocoder, HazardType, HydrologySource, QuakeFeed, Timeframe,
    WeatherSource,
};
