//! Service facade: fetch, decode, classify and wrap in the response envelope.

use anyhow::Result;

use crate::{
    Config,
    endpoint::Endpoint,
    model::{BasicWeather, ForecastReport, GateHours},
    provider::{
        EndpointRequest, Fetch,
        basic::parse_basic,
        overview::{build_report, parse_caption, parse_overview},
    },
    response::ApiResponse,
};

#[derive(Debug)]
pub struct WeatherService<F> {
    fetcher: F,
    config: Config,
}

impl<F: Fetch> WeatherService<F> {
    pub fn new(fetcher: F, config: Config) -> Self {
        Self { fetcher, config }
    }

    async fn fetch(&self, endpoint: Endpoint) -> Result<String> {
        let request = EndpointRequest::from_config(endpoint, &self.config);
        self.fetcher.get_text(&request).await
    }

    pub async fn fetch_basic(&self) -> Result<BasicWeather> {
        let body = self.fetch(Endpoint::Basic).await?;
        parse_basic(&body)
    }

    /// `location` names an endpoint constant, e.g. `FORECAST_URL`.
    pub async fn fetch_forecast(&self, location: &str) -> Result<ForecastReport> {
        let endpoint = Endpoint::from_name(location)?;
        let body = self.fetch(endpoint).await?;
        let overview = parse_overview(&body)?;
        Ok(build_report(overview))
    }

    pub async fn fetch_caption(&self, location: &str) -> Result<String> {
        let endpoint = Endpoint::from_name(location)?;
        let body = self.fetch(endpoint).await?;
        parse_caption(&body)
    }

    pub async fn basic(&self) -> ApiResponse<BasicWeather> {
        match self.fetch_basic().await {
            Ok(basic) => ApiResponse::data(basic),
            Err(err) => {
                tracing::error!("Error fetching weather data: {err:#}");
                ApiResponse::error_with(format!("Failed to retrieve weather data: {err:#}"))
            }
        }
    }

    pub async fn forecast(&self, location: &str) -> ApiResponse<ForecastReport> {
        match self.fetch_forecast(location).await {
            Ok(report) => ApiResponse::data(report),
            Err(err) => {
                tracing::error!(location, "Error fetching forecast data: {err:#}");
                ApiResponse::error_with(format!("Failed to retrieve forecast data: {err:#}"))
            }
        }
    }

    pub async fn caption(&self, location: &str) -> ApiResponse<String> {
        match self.fetch_caption(location).await {
            Ok(caption) => ApiResponse::data(caption),
            Err(err) => {
                tracing::error!(location, "Error fetching weather caption: {err:#}");
                ApiResponse::error_with(format!("Failed to retrieve weather information: {err:#}"))
            }
        }
    }

    pub fn gate_time(&self) -> ApiResponse<GateHours> {
        ApiResponse::data(self.config.gate.clone())
    }
}
