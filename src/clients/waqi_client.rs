//! Provides the `WaqiClient` for the World Air Quality Index project's `/feed/`
//! API, which returns one reading for a station picked by IP geolocation,
//! WAQI station index, or coordinate.

use crate::error::AqiError;
use crate::http::fetcher::{redact, JsonFetcher, ReqwestFetcher};
use crate::types::aqi_reading::{AqiReading, WaqiFeedData, WaqiResponse};
use crate::LatLon;
use bon::bon;
use log::{debug, warn};
use std::fmt;

/// Default base URL of the WAQI API.
pub const WAQI_BASE_URL: &str = "https://api.waqi.info";

const SOURCE_NAME: &str = "waqi";

/// How a WAQI feed request addresses its station.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FeedSelector {
    /// The station nearest to the caller's network location (`here`).
    #[default]
    Here,
    /// A WAQI station index (`@{uid}`). Must be a finite number >= 0.
    Station(f64),
    /// The station nearest to a coordinate (`geo:{lat};{lng}`).
    Geo(LatLon),
}

impl FeedSelector {
    /// Renders the selector path segment, validating station ids.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use airquality::{FeedSelector, LatLon};
    ///
    /// assert_eq!(FeedSelector::Here.path_segment().unwrap(), "here");
    /// assert_eq!(FeedSelector::Station(1624.0).path_segment().unwrap(), "@1624");
    /// assert_eq!(
    ///     FeedSelector::Geo(LatLon(25.03, 121.56)).path_segment().unwrap(),
    ///     "geo:25.03;121.56"
    /// );
    /// assert!(FeedSelector::Station(-1.0).path_segment().is_err());
    /// ```
    pub fn path_segment(&self) -> Result<String, AqiError> {
        match *self {
            FeedSelector::Here => Ok("here".to_string()),
            FeedSelector::Station(uid) => {
                if !uid.is_finite() || uid < 0.0 {
                    return Err(AqiError::InvalidStationId(uid));
                }
                // -0.0 would otherwise render as "-0"
                let uid = if uid == 0.0 { 0.0 } else { uid };
                Ok(format!("@{}", uid))
            }
            FeedSelector::Geo(LatLon(lat, lon)) => Ok(format!("geo:{};{}", lat, lon)),
        }
    }
}

impl From<LatLon> for FeedSelector {
    fn from(location: LatLon) -> Self {
        FeedSelector::Geo(location)
    }
}

impl From<u32> for FeedSelector {
    fn from(uid: u32) -> Self {
        FeedSelector::Station(f64::from(uid))
    }
}

impl fmt::Display for FeedSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path_segment() {
            Ok(segment) => f.write_str(&segment),
            Err(_) => write!(f, "@<invalid {:?}>", self),
        }
    }
}

/// Client for single readings from the WAQI aggregator.
///
/// Nothing is cached at this layer: every call issues exactly one request.
pub struct WaqiClient<F = ReqwestFetcher> {
    fetcher: F,
    base_url: String,
}

#[bon]
impl<F: JsonFetcher> WaqiClient<F> {
    /// Creates a client.
    ///
    /// # Arguments
    ///
    /// * `.fetcher(F)`: **Required.** Transport used for requests.
    /// * `.base_url(String)`: Optional. Defaults to [`WAQI_BASE_URL`].
    #[builder]
    pub fn new(fetcher: F, base_url: Option<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url
                .unwrap_or_else(|| WAQI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        }
    }

    /// Builds the feed URL for `selector`, with `token` as the query credential.
    ///
    /// # Errors
    ///
    /// Returns [`AqiError::InvalidStationId`] for a negative or non-finite station id.
    pub fn feed_url(&self, token: &str, selector: FeedSelector) -> Result<String, AqiError> {
        Ok(format!(
            "{}/feed/{}/?token={}",
            self.base_url,
            selector.path_segment()?,
            token
        ))
    }

    /// Fetches the current reading for `selector`.
    ///
    /// # Errors
    ///
    /// * [`AqiError::InvalidStationId`] if the selector carries an invalid id; no request is made.
    /// * [`AqiError::NetworkRequest`], [`AqiError::HttpStatus`], [`AqiError::ResponseBody`]
    ///   if the transport fails.
    /// * [`AqiError::ApiStatus`] if WAQI answers with a status other than `"ok"`.
    /// * [`AqiError::UnexpectedFormat`] if the payload does not describe a reading.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use airquality::{FeedSelector, ReqwestFetcher, WaqiClient, AqiError};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), AqiError> {
    /// let client = WaqiClient::builder().fetcher(ReqwestFetcher::new()).build();
    /// let reading = client.fetch_aqi_data("demo", FeedSelector::Here).await?;
    /// println!("{}: AQI {}", reading.station_name, reading.aqi);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch_aqi_data(
        &self,
        token: &str,
        selector: FeedSelector,
    ) -> Result<AqiReading, AqiError> {
        let url = self.feed_url(token, selector)?;
        debug!("Fetching WAQI feed for selector {}", selector);

        let payload = self.fetcher.get_json(&url).await?;
        let response: WaqiResponse = serde_json::from_value(payload).map_err(|e| {
            AqiError::unexpected_format(SOURCE_NAME, format!("missing status/data envelope: {}", e))
        })?;

        if response.status != "ok" {
            let message = match &response.data {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            warn!(
                "WAQI request {} reported status '{}': {}",
                redact(&url),
                response.status,
                message
            );
            return Err(AqiError::ApiStatus {
                status: response.status,
                message,
            });
        }

        let data: WaqiFeedData = serde_json::from_value(response.data).map_err(|e| {
            AqiError::unexpected_format(SOURCE_NAME, format!("malformed feed data: {}", e))
        })?;
        AqiReading::try_from(data)
    }
}
