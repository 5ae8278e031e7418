//! Core library for the `taishan` weather service.
//!
//! This crate defines:
//! - Hazard classification over atmospheric readings (rime, freezing rain, wind level, ...)
//! - Typed models for the upstream payloads
//! - Fetching and decoding of the upstream endpoints
//! - The `{code, message, data}` response envelope
//! - Configuration handling
//!
//! It is used by `taishan-cli`, but can also be reused by other binaries or services.

pub mod classify;
pub mod config;
pub mod endpoint;
pub mod extract;
pub mod model;
pub mod provider;
pub mod response;
pub mod service;

pub use classify::{Assessed, Conditions, Reading, WindLevel};
pub use config::{Config, EndpointConfig};
pub use endpoint::Endpoint;
pub use model::{
    BasicWeather, CurrentConditions, CurrentReport, ForecastReport, GateHours, HourlyForecast,
    WeatherAlert,
};
pub use provider::{EndpointRequest, Fetch, HttpFetcher};
pub use response::ApiResponse;
pub use service::WeatherService;
