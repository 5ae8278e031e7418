//! Human-readable rendering of service responses.

use std::fmt::Write as _;

use chrono::NaiveTime;
use serde::Serialize;
use taishan_core::{
    ApiResponse, Assessed, BasicWeather, Conditions, ForecastReport, GateHours, HourlyForecast,
    WindLevel,
};

/// Print `resp` either as the JSON envelope or via `render`. Returns whether it was a success.
pub fn emit<T: Serialize>(
    resp: &ApiResponse<T>,
    json: bool,
    render: impl FnOnce(&T) -> String,
) -> anyhow::Result<bool> {
    if json {
        println!("{}", serde_json::to_string_pretty(resp)?);
    } else {
        match (&resp.data, resp.is_success()) {
            (Some(data), true) => println!("{}", render(data)),
            _ => eprintln!("Error ({}): {}", resp.code, resp.message),
        }
    }

    Ok(resp.is_success())
}

pub fn render_basic(b: &BasicWeather) -> String {
    let observed = b
        .observed_time()
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| b.time.clone());
    let temp = b
        .temperature_c()
        .map(|t| format!("{t:.1}°C"))
        .unwrap_or_else(|| format!("{}°C", b.temp_c));
    let humidity = b.humidity_pct().map(|h| format!("{h:.0}%")).unwrap_or_else(|| "n/a".into());

    let mut out = String::new();
    let _ = writeln!(out, "{} ({}) {} {observed}", b.city_name, b.name_en, b.date);
    let _ = writeln!(out, "  {} / {}, {temp} ({}°F)", b.weather_zh, b.weather_en, b.temp_f);
    let _ = writeln!(
        out,
        "  Humidity {humidity}, wind {} {}, pressure {} hPa, visibility {}",
        b.wind_direction, b.wind_strength, b.pressure, b.visibility
    );
    let _ = write!(out, "  AQI {}, PM2.5 {}, rain 24h {}", b.aqi, b.aqi_pm25, b.rain_last_24h);
    out
}

pub fn render_forecast(report: &ForecastReport, hazards_only: bool) -> String {
    let current = &report.current;
    let now = &current.observed.reading;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Now: {} {:.1}°C (feels {:.1}°C), humidity {:.0}%, wind {:.1} m/s {}",
        now.caption,
        now.temperature,
        now.feels_like,
        now.humidity,
        now.wind_speed,
        now.provider_wind_dir
    );
    let _ = writeln!(out, "Hazards: {}", describe(&current.observed.conditions));
    if current.thunder {
        let _ = writeln!(out, "Thunderstorm alert in effect");
    }
    let _ = writeln!(out, "Forecast rain total: {:.1} mm", current.rain_amount);
    let _ = writeln!(out, "{}", current.comment);

    let hours: Vec<_> = report
        .forecast
        .iter()
        .filter(|h| !hazards_only || h.conditions.any_hazard())
        .collect();

    let _ = write!(out, "\nHourly ({} of {}):", hours.len(), report.forecast.len());
    for hour in hours {
        let _ = write!(out, "\n  {}", render_hour(hour));
    }

    out
}

fn render_hour(hour: &Assessed<HourlyForecast>) -> String {
    let h = &hour.reading;
    let when = h
        .created_at()
        .map(|t| t.format("%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| h.created.clone());

    format!(
        "{when}  {}  {:.1}°C  rain {:.1} mm  wind {:.1} m/s  [{}]",
        h.caption,
        h.temperature,
        h.rain_amount,
        h.wind_speed,
        describe(&hour.conditions)
    )
}

pub fn render_gate(gate: &GateHours, now: NaiveTime) -> String {
    let state = match gate.is_open_at(now) {
        Some(true) => " (open now)",
        Some(false) => " (closed now)",
        None => "",
    };
    format!("Gate open {} - {}{state}", gate.open_time, gate.close_time)
}

pub fn hazard_labels(c: &Conditions) -> Vec<&'static str> {
    let mut labels = Vec::new();
    if c.rime {
        labels.push("rime");
    }
    if c.freezing_rain {
        labels.push("freezing rain");
    }
    if c.sea_of_clouds {
        labels.push("sea of clouds");
    }
    if c.blizzard {
        labels.push("blizzard");
    }
    if c.freezing {
        labels.push("freezing");
    }
    if c.wind_level > WindLevel::NoWarning {
        labels.push(c.wind_level.as_str());
    }
    labels
}

fn describe(c: &Conditions) -> String {
    let labels = hazard_labels(c);
    if labels.is_empty() { "none".to_string() } else { labels.join(", ") }
}
