//! Hazard classification over a single atmospheric reading.
//!
//! Every check is a pure threshold comparison. Out-of-range inputs are not
//! errors, they simply fail the comparison and evaluate to `false`.

use serde::{Deserialize, Serialize};

/// Wind hazard level, ordered from calmest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WindLevel {
    NoWarning,
    WindWarning,
    Gale,
    StrongGale,
}

impl WindLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindLevel::NoWarning => "NoWarning",
            WindLevel::WindWarning => "WindWarning",
            WindLevel::Gale => "Gale",
            WindLevel::StrongGale => "StrongGale",
        }
    }
}

impl std::fmt::Display for WindLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dew point within 2 °C of the air temperature, bounds inclusive.
fn dew_point_near(temp: f64, dew_point: f64) -> bool {
    dew_point >= temp - 2.0 && dew_point <= temp + 2.0
}

/// Rime (ice fog deposit): cold, saturated, light wind, overcast.
pub fn is_rime(temp: f64, humidity: f64, dew_point: f64, wind_speed: f64, cloud_cover: f64) -> bool {
    (-10.0..=0.0).contains(&temp)
        && humidity >= 70.0
        && dew_point_near(temp, dew_point)
        && (1.0..=3.0).contains(&wind_speed)
        && cloud_cover >= 90.0
}

/// Freezing rain: sub-zero air with active precipitation under full cloud.
pub fn is_freezing_rain(
    temp: f64,
    precipitation: f64,
    humidity: f64,
    dew_point: f64,
    cloud_cover: f64,
) -> bool {
    temp < 0.0
        && precipitation > 0.0
        && humidity >= 70.0
        && dew_point_near(temp, dew_point)
        && cloud_cover >= 90.0
}

/// Sea of clouds, judged on low cloud cover alone.
pub fn is_sea_of_clouds(low_cloud_cover: f64) -> bool {
    low_cloud_cover > 70.0
}

pub fn is_blizzard(precipitation_rate: f64, wind_speed: f64, humidity: f64, temp: f64) -> bool {
    precipitation_rate > 10.0 && wind_speed >= 17.0 && humidity >= 80.0 && temp < 0.0
}

pub fn is_freezing(actual_temp: f64, dew_point: f64, relative_humidity: f64) -> bool {
    actual_temp <= 0.0 && dew_point <= 0.0 && relative_humidity > 70.0
}

/// Thresholds are checked highest first, so a speed sitting exactly on a
/// boundary lands in the stronger level.
pub fn evaluate_wind_level(wind_speed: f64) -> WindLevel {
    if wind_speed >= 17.0 {
        WindLevel::StrongGale
    } else if wind_speed >= 14.0 {
        WindLevel::Gale
    } else if wind_speed >= 11.0 {
        WindLevel::WindWarning
    } else {
        WindLevel::NoWarning
    }
}

/// One set of simultaneous measurements, as consumed by the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// °C
    pub temperature: f64,
    /// Relative humidity, %.
    pub humidity: f64,
    /// °C
    pub dew_point: f64,
    /// m/s
    pub wind_speed: f64,
    /// %
    pub cloud_cover: f64,
    /// Rain amount in mm. Callers must resolve a missing value before building a reading.
    pub precipitation: f64,
}

impl Reading {
    pub fn classify(&self) -> Conditions {
        classify(self)
    }
}

/// Hazard flags derived from a [`Reading`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditions {
    pub rime: bool,
    pub freezing_rain: bool,
    pub sea_of_clouds: bool,
    pub blizzard: bool,
    pub freezing: bool,
    pub wind_level: WindLevel,
}

impl Conditions {
    /// True when any boolean hazard is set or the wind reaches a warning level.
    pub fn any_hazard(&self) -> bool {
        self.rime
            || self.freezing_rain
            || self.blizzard
            || self.freezing
            || self.wind_level > WindLevel::NoWarning
    }
}

pub fn classify(r: &Reading) -> Conditions {
    Conditions {
        rime: is_rime(r.temperature, r.humidity, r.dew_point, r.wind_speed, r.cloud_cover),
        freezing_rain: is_freezing_rain(
            r.temperature,
            r.precipitation,
            r.humidity,
            r.dew_point,
            r.cloud_cover,
        ),
        sea_of_clouds: is_sea_of_clouds(r.cloud_cover),
        blizzard: is_blizzard(r.precipitation, r.wind_speed, r.humidity, r.temperature),
        freezing: is_freezing(r.temperature, r.dew_point, r.humidity),
        wind_level: evaluate_wind_level(r.wind_speed),
    }
}

/// A raw record together with the conditions derived from it.
///
/// Both halves are flattened on the wire so clients see a single object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessed<R> {
    #[serde(flatten)]
    pub reading: R,
    #[serde(flatten)]
    pub conditions: Conditions,
}

impl<R> Assessed<R> {
    pub fn new(reading: R, conditions: Conditions) -> Self {
        Self { reading, conditions }
    }
}
