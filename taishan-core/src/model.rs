use chrono::{DateTime, FixedOffset, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::classify::{Assessed, Reading};

/// Station snapshot published by the basic provider.
///
/// Every value arrives as a string (`"39%"`, `"5km/h"`, ...) and is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicWeather {
    #[serde(rename = "city")]
    pub city_code: String,
    #[serde(rename = "cityname")]
    pub city_name: String,
    #[serde(rename = "nameen", default)]
    pub name_en: String,
    #[serde(rename = "temp")]
    pub temp_c: String,
    #[serde(rename = "tempf", default)]
    pub temp_f: String,
    #[serde(rename = "weather")]
    pub weather_zh: String,
    #[serde(rename = "weathere", default)]
    pub weather_en: String,
    #[serde(rename = "weathercode", default)]
    pub weather_code: String,
    #[serde(rename = "WD", default)]
    pub wind_direction: String,
    #[serde(rename = "wde", default)]
    pub wind_direction_en: String,
    #[serde(rename = "WS", default)]
    pub wind_strength: String,
    #[serde(rename = "wse", default)]
    pub wind_speed_en: String,
    #[serde(rename = "SD", default)]
    pub humidity_percentage: String,
    #[serde(rename = "sd", default)]
    pub humidity: String,
    #[serde(rename = "qy", default)]
    pub pressure: String,
    #[serde(rename = "njd", default)]
    pub visibility: String,
    #[serde(rename = "rain", default)]
    pub rain: String,
    #[serde(rename = "rain24h", default)]
    pub rain_last_24h: String,
    #[serde(rename = "aqi", default)]
    pub aqi: String,
    #[serde(rename = "aqi_pm25", default)]
    pub aqi_pm25: String,
    #[serde(rename = "limitnumber", default)]
    pub limit_number: String,
    /// e.g. `03月08日(星期六)`
    #[serde(rename = "date", default)]
    pub date: String,
    /// Local observation time, `HH:MM`.
    #[serde(rename = "time", default)]
    pub time: String,
}

impl BasicWeather {
    pub fn temperature_c(&self) -> Option<f64> {
        self.temp_c.trim().parse().ok()
    }

    /// Relative humidity with the trailing `%` stripped.
    pub fn humidity_pct(&self) -> Option<f64> {
        let raw = if self.humidity.is_empty() { &self.humidity_percentage } else { &self.humidity };
        raw.trim().trim_end_matches('%').parse().ok()
    }

    pub fn observed_time(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(self.time.trim(), "%H:%M").ok()
    }
}

/// Current observation from the forecast provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    #[serde(rename = "cap")]
    pub caption: String,
    /// `"d"` for day, `"n"` for night.
    #[serde(default)]
    pub daytime: String,
    #[serde(rename = "feels")]
    pub feels_like: f64,
    #[serde(rename = "dewPt")]
    pub dew_point: f64,
    #[serde(rename = "rh")]
    pub humidity: f64,
    #[serde(rename = "temp")]
    pub temperature: f64,
    #[serde(rename = "windSpd")]
    pub wind_speed: f64,
    #[serde(rename = "pvdrWindDir", default)]
    pub provider_wind_dir: String,
    #[serde(rename = "pvdrWindSpd", default)]
    pub provider_wind_speed: String,
    #[serde(rename = "baro", default)]
    pub pressure: f64,
    #[serde(default)]
    pub aqi: f64,
    #[serde(rename = "vis", default)]
    pub visibility: f64,
    #[serde(default)]
    pub uv: f64,
    #[serde(rename = "cloudCover")]
    pub cloud_cover: f64,
    /// RFC 3339, e.g. `2025-03-16T15:41:00+08:00`.
    pub created: String,
}

impl CurrentConditions {
    /// The provider reports no rain amount for the current hour, so the
    /// caller supplies one.
    pub fn reading(&self, precipitation: f64) -> Reading {
        Reading {
            temperature: self.temperature,
            humidity: self.humidity,
            dew_point: self.dew_point,
            wind_speed: self.wind_speed,
            cloud_cover: self.cloud_cover,
            precipitation,
        }
    }

    pub fn created_at(&self) -> anyhow::Result<DateTime<FixedOffset>> {
        parse_created(&self.created)
    }
}

/// One hour of the provider forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    #[serde(rename = "cap")]
    pub caption: String,
    #[serde(rename = "feels")]
    pub feels_like: f64,
    #[serde(rename = "rh")]
    pub humidity: f64,
    /// Probability of precipitation.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub precip: f64,
    #[serde(rename = "temp")]
    pub temperature: f64,
    pub created: String,
    /// mm
    #[serde(rename = "rainAmount", default, deserialize_with = "null_as_zero")]
    pub rain_amount: f64,
    #[serde(rename = "windSpd")]
    pub wind_speed: f64,
    /// Rain accumulated over the past 24 hours, mm.
    #[serde(rename = "raAccu", default, deserialize_with = "null_as_zero")]
    pub rain_accumulated: f64,
    #[serde(rename = "cloudCover")]
    pub cloud_cover: f64,
    #[serde(rename = "dewPt")]
    pub dew_point: f64,
    #[serde(default)]
    pub sunrise: Option<String>,
    #[serde(default)]
    pub sunset: Option<String>,
}

impl HourlyForecast {
    pub fn reading(&self) -> Reading {
        Reading {
            temperature: self.temperature,
            humidity: self.humidity,
            dew_point: self.dew_point,
            wind_speed: self.wind_speed,
            cloud_cover: self.cloud_cover,
            precipitation: self.rain_amount,
        }
    }

    pub fn created_at(&self) -> anyhow::Result<DateTime<FixedOffset>> {
        parse_created(&self.created)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeatherAlert {
    pub id: Option<String>,
    pub title: String,
    pub event: Option<String>,
    pub event_name: Option<String>,
    pub level: Option<String>,
    pub severity: Option<String>,
    pub short_cap: Option<String>,
    pub credit: Option<String>,
    pub safety_guide: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Current conditions enriched with the forecast-wide rain total and alert summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentReport {
    #[serde(flatten)]
    pub observed: Assessed<CurrentConditions>,
    /// Sum of the rain amounts of every forecast hour, mm.
    pub rain_amount: f64,
    pub thunder: bool,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub current: CurrentReport,
    pub forecast: Vec<Assessed<HourlyForecast>>,
}

/// Opening hours of the mountain gate, `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateHours {
    pub open_time: String,
    pub close_time: String,
}

impl Default for GateHours {
    fn default() -> Self {
        Self { open_time: "08:00".to_string(), close_time: "16:00".to_string() }
    }
}

impl GateHours {
    /// Whether `at` falls in `[open_time, close_time)`; `None` if either bound is not `HH:MM`.
    pub fn is_open_at(&self, at: NaiveTime) -> Option<bool> {
        let open = NaiveTime::parse_from_str(&self.open_time, "%H:%M").ok()?;
        let close = NaiveTime::parse_from_str(&self.close_time, "%H:%M").ok()?;
        Some(open <= at && at < close)
    }
}

/// The provider sends `null` for hours without a measurement.
fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

fn parse_created(raw: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    use anyhow::Context;

    DateTime::parse_from_rfc3339(raw).with_context(|| format!("Invalid timestamp '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT: &str = r#"{
        "cap": "多云", "daytime": "d", "feels": 6.5, "dewPt": -3.0, "rh": 55.0,
        "temp": 8.0, "windSpd": 12.0, "pvdrWindDir": "西南风", "pvdrWindSpd": "3级",
        "baro": 1015.0, "aqi": 42.0, "vis": 10.0, "uv": 2.0, "cloudCover": 60.0,
        "created": "2025-03-16T15:41:00+08:00", "icon": 3
    }"#;

    #[test]
    fn current_conditions_decode_ignoring_unknown_fields() {
        let current: CurrentConditions = serde_json::from_str(CURRENT).unwrap();

        assert_eq!(current.caption, "多云");
        assert_eq!(current.dew_point, -3.0);
        assert_eq!(current.provider_wind_speed, "3级");

        let created = current.created_at().unwrap();
        assert_eq!(created.offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn current_reading_takes_supplied_precipitation() {
        let current: CurrentConditions = serde_json::from_str(CURRENT).unwrap();
        let reading = current.reading(3.5);

        assert_eq!(reading.precipitation, 3.5);
        assert_eq!(reading.temperature, 8.0);
        assert_eq!(reading.cloud_cover, 60.0);
    }

    #[test]
    fn hourly_defaults_missing_rain_fields() {
        let hour: HourlyForecast = serde_json::from_str(
            r#"{"cap":"晴","feels":1.0,"rh":30.0,"temp":2.0,"created":"2025-03-16T16:00:00+08:00",
                "windSpd":4.0,"cloudCover":10.0,"dewPt":-8.0}"#,
        )
        .unwrap();

        assert_eq!(hour.rain_amount, 0.0);
        assert_eq!(hour.rain_accumulated, 0.0);
        assert!(hour.sunrise.is_none());
        assert_eq!(hour.reading().precipitation, 0.0);
    }

    #[test]
    fn hourly_null_rain_fields_read_as_zero() {
        let hour: HourlyForecast = serde_json::from_str(
            r#"{"cap":"阴","feels":1.0,"rh":70.0,"precip":null,"temp":2.0,"created":"2025-03-16T17:00:00+08:00",
                "rainAmount":null,"windSpd":4.0,"raAccu":null,"cloudCover":80.0,"dewPt":-1.0}"#,
        )
        .unwrap();

        assert_eq!(hour.precip, 0.0);
        assert_eq!(hour.rain_amount, 0.0);
        assert_eq!(hour.rain_accumulated, 0.0);
    }

    #[test]
    fn bad_created_timestamp_is_an_error() {
        let mut current: CurrentConditions = serde_json::from_str(CURRENT).unwrap();
        current.created = "yesterday".into();

        let err = current.created_at().unwrap_err();
        assert!(err.to_string().contains("Invalid timestamp"));
    }

    #[test]
    fn basic_weather_helpers_parse_strings() {
        let basic: BasicWeather = serde_json::from_str(
            r#"{"city":"101120801","cityname":"泰安","temp":"7","weather":"多云","SD":"39%","time":"17:30"}"#,
        )
        .unwrap();

        assert_eq!(basic.temperature_c(), Some(7.0));
        assert_eq!(basic.humidity_pct(), Some(39.0));
        assert_eq!(basic.observed_time(), NaiveTime::from_hms_opt(17, 30, 0));
        assert_eq!(basic.wind_strength, "");
    }

    #[test]
    fn gate_open_window_is_half_open() {
        let gate = GateHours::default();
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();

        assert_eq!(gate.is_open_at(t(8, 0)), Some(true));
        assert_eq!(gate.is_open_at(t(15, 59)), Some(true));
        assert_eq!(gate.is_open_at(t(16, 0)), Some(false));
        assert_eq!(gate.is_open_at(t(7, 59)), Some(false));

        let broken = GateHours { open_time: "eight".into(), close_time: "16:00".into() };
        assert_eq!(broken.is_open_at(t(9, 0)), None);
    }

    #[test]
    fn gate_hours_default_and_wire_names() {
        let value = serde_json::to_value(GateHours::default()).unwrap();
        assert_eq!(value, serde_json::json!({"openTime": "08:00", "closeTime": "16:00"}));
    }
}
