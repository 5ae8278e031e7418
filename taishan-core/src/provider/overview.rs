//! Decoding and enrichment of the forecast overview document.

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;

use crate::{
    classify::Assessed,
    model::{CurrentConditions, CurrentReport, ForecastReport, HourlyForecast, WeatherAlert},
};

/// Alerts whose title contains this mark a thunderstorm.
pub const THUNDER_KEYWORD: &str = "雷电";

#[derive(Debug, Deserialize)]
struct OverviewDocument {
    #[serde(default)]
    responses: Vec<OverviewResponse>,
}

#[derive(Debug, Deserialize)]
struct OverviewResponse {
    #[serde(default)]
    weather: Vec<OverviewWeather>,
}

#[derive(Debug, Deserialize)]
struct OverviewWeather {
    current: CurrentConditions,
    #[serde(default)]
    alerts: Vec<WeatherAlert>,
    forecast: OverviewForecast,
}

#[derive(Debug, Deserialize)]
struct OverviewForecast {
    #[serde(default)]
    days: Vec<OverviewDay>,
}

#[derive(Debug, Deserialize)]
struct OverviewDay {
    #[serde(default)]
    hourly: Vec<HourlyForecast>,
    #[serde(default)]
    almanac: Almanac,
}

#[derive(Debug, Default, Deserialize)]
struct Almanac {
    sunrise: Option<String>,
    sunset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionDocument {
    #[serde(default)]
    responses: Vec<CaptionResponse>,
}

#[derive(Debug, Deserialize)]
struct CaptionResponse {
    #[serde(default)]
    weather: Vec<CaptionWeather>,
}

#[derive(Debug, Deserialize)]
struct CaptionWeather {
    current: CaptionCurrent,
}

#[derive(Debug, Deserialize)]
struct CaptionCurrent {
    cap: String,
}

/// The parts of the overview document the service uses.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub current: CurrentConditions,
    pub alerts: Vec<WeatherAlert>,
    /// Every hour of every forecast day, in document order.
    pub hourly: Vec<HourlyForecast>,
}

pub fn parse_overview(body: &str) -> Result<Overview> {
    if body.trim().is_empty() {
        bail!("Empty response body.");
    }

    let doc: OverviewDocument =
        serde_json::from_str(body).context("Failed to parse forecast overview JSON")?;

    let weather = doc
        .responses
        .into_iter()
        .next()
        .and_then(|r| r.weather.into_iter().next())
        .ok_or_else(|| anyhow!("Forecast overview contained no responses[0].weather[0]"))?;

    let mut hourly = Vec::new();
    for day in weather.forecast.days {
        for mut hour in day.hourly {
            hour.sunrise = day.almanac.sunrise.clone();
            hour.sunset = day.almanac.sunset.clone();
            hourly.push(hour);
        }
    }

    Ok(Overview { current: weather.current, alerts: weather.alerts, hourly })
}

/// Reads only `responses[0].weather[0].current.cap`, ignoring the rest of the document.
pub fn parse_caption(body: &str) -> Result<String> {
    if body.trim().is_empty() {
        bail!("Empty response body.");
    }

    let doc: CaptionDocument =
        serde_json::from_str(body).context("Failed to parse forecast overview JSON")?;

    doc.responses
        .into_iter()
        .next()
        .and_then(|r| r.weather.into_iter().next())
        .map(|w| w.current.cap)
        .ok_or_else(|| anyhow!("Forecast overview contained no responses[0].weather[0]"))
}

/// Classify every hour, then the current observation using the forecast rain total.
pub fn build_report(overview: Overview) -> ForecastReport {
    let forecast: Vec<_> = overview
        .hourly
        .into_iter()
        .map(|hour| {
            let conditions = hour.reading().classify();
            Assessed::new(hour, conditions)
        })
        .collect();

    let rain_amount: f64 = forecast.iter().map(|h| h.reading.rain_amount).sum();
    let conditions = overview.current.reading(rain_amount).classify();

    let thunder = overview.alerts.iter().any(|a| a.title.contains(THUNDER_KEYWORD));
    let comment = overview
        .alerts
        .iter()
        .find_map(|a| a.safety_guide.clone().filter(|g| !g.trim().is_empty()))
        .unwrap_or_else(|| default_comment(&overview.current));

    tracing::debug!(
        hours = forecast.len(),
        rain_amount,
        thunder,
        wind_level = %conditions.wind_level,
        "Built forecast report"
    );

    ForecastReport {
        current: CurrentReport {
            observed: Assessed::new(overview.current, conditions),
            rain_amount,
            thunder,
            comment,
        },
        forecast,
    }
}

fn default_comment(current: &CurrentConditions) -> String {
    format!(
        "当前的温度为 {:.1}°C，体感为温度 {:.1}°C,请注意天气变化",
        current.temperature, current.feels_like
    )
}
