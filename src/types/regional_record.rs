//! Defines the station record published by Taiwan's MOENV `aqx_p_432` dataset
//! and the payload shapes the endpoint is known to answer with.

use crate::error::AqiError;
use crate::types::aqi_level::AqiLevel;
use crate::LatLon;
use serde::{Deserialize, Serialize};

/// One monitoring station's latest hourly report from MOENV.
///
/// MOENV publishes every value as a string, including numbers and coordinates,
/// and uses an empty string or a marker such as `"-"` for missing data. The
/// fields are kept verbatim; use the helper methods for numeric access. A
/// `null` field reads as an empty string and a bare JSON number keeps its
/// textual form, so one sparse record never rejects the whole batch.
///
/// The full set of records refreshes together as a batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionalStationRecord {
    /// Station name (e.g. "板橋").
    #[serde(rename = "sitename", deserialize_with = "lenient_string")]
    pub site_name: String,
    /// County the station is in (e.g. "新北市").
    #[serde(deserialize_with = "lenient_string")]
    pub county: String,
    /// Composite AQI.
    #[serde(deserialize_with = "lenient_string")]
    pub aqi: String,
    /// Dominant pollutant label, empty when AQI is low.
    #[serde(deserialize_with = "lenient_string")]
    pub pollutant: String,
    /// Status label (e.g. "良好").
    #[serde(deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(deserialize_with = "lenient_string")]
    pub so2: String,
    #[serde(deserialize_with = "lenient_string")]
    pub co: String,
    #[serde(deserialize_with = "lenient_string")]
    pub o3: String,
    #[serde(deserialize_with = "lenient_string")]
    pub o3_8hr: String,
    #[serde(deserialize_with = "lenient_string")]
    pub pm10: String,
    #[serde(rename = "pm2.5", deserialize_with = "lenient_string")]
    pub pm2_5: String,
    #[serde(deserialize_with = "lenient_string")]
    pub no2: String,
    #[serde(deserialize_with = "lenient_string")]
    pub nox: String,
    #[serde(deserialize_with = "lenient_string")]
    pub no: String,
    #[serde(deserialize_with = "lenient_string")]
    pub wind_speed: String,
    #[serde(rename = "wind_direc", deserialize_with = "lenient_string")]
    pub wind_direction: String,
    #[serde(rename = "publishtime", deserialize_with = "lenient_string")]
    pub publish_time: String,
    #[serde(deserialize_with = "lenient_string")]
    pub co_8hr: String,
    #[serde(rename = "pm2.5_avg", deserialize_with = "lenient_string")]
    pub pm2_5_avg: String,
    #[serde(deserialize_with = "lenient_string")]
    pub pm10_avg: String,
    #[serde(deserialize_with = "lenient_string")]
    pub so2_avg: String,
    #[serde(deserialize_with = "lenient_string")]
    pub longitude: String,
    #[serde(deserialize_with = "lenient_string")]
    pub latitude: String,
    #[serde(rename = "siteid", deserialize_with = "lenient_string")]
    pub site_id: String,
}

impl RegionalStationRecord {
    /// Parses the latitude/longitude strings. Returns `None` if either does not
    /// parse to a finite number.
    pub fn coordinates(&self) -> Option<LatLon> {
        let lat = parse_number(&self.latitude)?;
        let lon = parse_number(&self.longitude)?;
        Some(LatLon(lat, lon))
    }

    /// Numeric AQI, if the station reported one.
    pub fn aqi_value(&self) -> Option<f64> {
        parse_number(&self.aqi)
    }

    pub fn level(&self) -> Option<AqiLevel> {
        self.aqi_value().and_then(AqiLevel::from_aqi)
    }
}

/// Accepts a string, a number, a boolean or `null` for a MOENV text field.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct LenientVisitor;

    impl<'de> Visitor<'de> for LenientVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, a number or null")
        }

        fn visit_str<E>(self, value: &str) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_bool<E>(self, value: bool) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_none<E>(self) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }

        fn visit_unit<E>(self) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(LenientVisitor)
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// The shapes the regional endpoint answers with: a bare array, or an object
/// wrapping the array in `records` alongside paging metadata.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RegionalPayload {
    Bare(Vec<RegionalStationRecord>),
    Paged { records: Vec<RegionalStationRecord> },
}

/// Validates a regional response body into its station records.
pub(crate) fn parse_regional_payload(
    payload: serde_json::Value,
) -> Result<Vec<RegionalStationRecord>, AqiError> {
    match serde_json::from_value::<RegionalPayload>(payload) {
        Ok(RegionalPayload::Bare(records)) | Ok(RegionalPayload::Paged { records }) => Ok(records),
        Err(e) => Err(AqiError::unexpected_format(
            "moenv",
            format!("expected an array of records or an object with a 'records' array ({})", e),
        )),
    }
}
