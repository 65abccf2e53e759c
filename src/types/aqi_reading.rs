//! Data structures for a single WAQI feed reading, plus the wire types the
//! raw `/feed/` payload is validated through before it reaches callers.

use crate::error::AqiError;
use crate::types::aqi_level::AqiLevel;
use crate::LatLon;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

const SOURCE_NAME: &str = "waqi";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// One AQI reading from the WAQI aggregator.
///
/// Immutable once fetched. Every call to
/// [`WaqiClient::fetch_aqi_data`](crate::WaqiClient::fetch_aqi_data) yields a
/// fresh value; nothing here is cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AqiReading {
    /// The composite AQI value.
    pub aqi: f64,
    /// WAQI's numeric station index, usable with [`FeedSelector::Station`](crate::FeedSelector::Station).
    pub station_index: Option<u64>,
    /// Human-readable station name (e.g. "Taipei, Taiwan").
    pub station_name: String,
    /// Station location.
    pub location: LatLon,
    /// Observation time in the station's local offset.
    pub observed_at: DateTime<FixedOffset>,
    /// The offset string reported alongside the observation (e.g. "+08:00").
    pub timezone: String,
    /// Code of the pollutant driving the AQI, when reported (e.g. "pm25").
    pub dominant_pollutant: Option<String>,
    /// Individual measurements. Each is optional; stations report different sets.
    pub pollutants: Pollutants,
}

impl AqiReading {
    /// Health-concern category for this reading's AQI.
    pub fn level(&self) -> Option<AqiLevel> {
        AqiLevel::from_aqi(self.aqi)
    }
}

/// A measurement code in WAQI's `iaqi` map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Pollutant {
    Pm25,
    Pm10,
    O3,
    No2,
    So2,
    Co,
    Temperature,
    Wind,
    Humidity,
    Pressure,
}

impl Pollutant {
    pub const ALL: [Pollutant; 10] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::O3,
        Pollutant::No2,
        Pollutant::So2,
        Pollutant::Co,
        Pollutant::Temperature,
        Pollutant::Wind,
        Pollutant::Humidity,
        Pollutant::Pressure,
    ];

    /// The key WAQI uses for this measurement.
    pub fn code(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm25",
            Pollutant::Pm10 => "pm10",
            Pollutant::O3 => "o3",
            Pollutant::No2 => "no2",
            Pollutant::So2 => "so2",
            Pollutant::Co => "co",
            Pollutant::Temperature => "t",
            Pollutant::Wind => "w",
            Pollutant::Humidity => "h",
            Pollutant::Pressure => "p",
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Per-pollutant measurements of a reading. `None` means the station did not
/// report that value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Pollutants {
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub o3: Option<f64>,
    pub no2: Option<f64>,
    pub so2: Option<f64>,
    pub co: Option<f64>,
    pub temperature: Option<f64>,
    pub wind: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
}

impl Pollutants {
    pub fn get(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::O3 => self.o3,
            Pollutant::No2 => self.no2,
            Pollutant::So2 => self.so2,
            Pollutant::Co => self.co,
            Pollutant::Temperature => self.temperature,
            Pollutant::Wind => self.wind,
            Pollutant::Humidity => self.humidity,
            Pollutant::Pressure => self.pressure,
        }
    }

    /// Iterates the reported measurements in [`Pollutant::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, f64)> + '_ {
        Pollutant::ALL
            .into_iter()
            .filter_map(|p| self.get(p).map(|v| (p, v)))
    }
}

// --- Wire types ---

#[derive(Debug, Deserialize)]
pub(crate) struct WaqiResponse {
    pub status: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WaqiFeedData {
    aqi: f64,
    #[serde(default)]
    idx: Option<u64>,
    city: WaqiCity,
    time: WaqiTime,
    #[serde(default)]
    iaqi: WaqiIaqi,
    #[serde(default)]
    dominentpol: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WaqiCity {
    name: String,
    geo: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct WaqiTime {
    s: String,
    tz: String,
}

#[derive(Debug, Default, Deserialize)]
struct WaqiIaqi {
    pm25: Option<IaqiValue>,
    pm10: Option<IaqiValue>,
    o3: Option<IaqiValue>,
    no2: Option<IaqiValue>,
    so2: Option<IaqiValue>,
    co: Option<IaqiValue>,
    t: Option<IaqiValue>,
    w: Option<IaqiValue>,
    h: Option<IaqiValue>,
    p: Option<IaqiValue>,
}

#[derive(Debug, Deserialize)]
struct IaqiValue {
    v: f64,
}

fn value(v: Option<IaqiValue>) -> Option<f64> {
    v.map(|iv| iv.v)
}

impl TryFrom<WaqiFeedData> for AqiReading {
    type Error = AqiError;

    fn try_from(data: WaqiFeedData) -> Result<Self, Self::Error> {
        let &[lat, lon] = data.city.geo.as_slice() else {
            return Err(AqiError::unexpected_format(
                SOURCE_NAME,
                format!(
                    "expected [lat, lng] for city.geo, got {} values",
                    data.city.geo.len()
                ),
            ));
        };

        let stamp = format!("{} {}", data.time.s, data.time.tz);
        let observed_at = DateTime::parse_from_str(&stamp, TIME_FORMAT).map_err(|e| {
            AqiError::unexpected_format(
                SOURCE_NAME,
                format!("unparseable observation time '{}': {}", stamp, e),
            )
        })?;

        let iaqi = data.iaqi;
        Ok(AqiReading {
            aqi: data.aqi,
            station_index: data.idx,
            station_name: data.city.name,
            location: LatLon(lat, lon),
            observed_at,
            timezone: data.time.tz,
            dominant_pollutant: data.dominentpol,
            pollutants: Pollutants {
                pm25: value(iaqi.pm25),
                pm10: value(iaqi.pm10),
                o3: value(iaqi.o3),
                no2: value(iaqi.no2),
                so2: value(iaqi.so2),
                co: value(iaqi.co),
                temperature: value(iaqi.t),
                wind: value(iaqi.w),
                humidity: value(iaqi.h),
                pressure: value(iaqi.p),
            },
        })
    }
}
