//! Provides the `MoenvClient` for Taiwan's Ministry of Environment open data
//! portal. The `aqx_p_432` dataset only comes as one batch covering every
//! monitoring station, so the client caches the whole batch and answers
//! single-station lookups from it.

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::timed_cache::TimedCache;
use crate::error::AqiError;
use crate::http::fetcher::{JsonFetcher, ReqwestFetcher};
use crate::stations::locate_station::nearest_station;
use crate::types::regional_record::{parse_regional_payload, RegionalStationRecord};
use crate::LatLon;
use bon::bon;
use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, info};
use std::sync::Arc;

/// Default endpoint of the MOENV real-time AQI dataset.
pub const MOENV_AQI_URL: &str = "https://data.moenv.gov.tw/api/v2/aqx_p_432";

/// Default freshness window of the cached regional dataset.
pub const REGIONAL_CACHE_TTL_SECS: i64 = 5 * 60;

/// Client for Taiwan's MOENV real-time AQI dataset.
///
/// The full station set is cached for a fixed window (five minutes by
/// default). Reads inside the window return the cached set without a request;
/// the first read after it re-fetches and swaps in the new set as a whole.
/// Concurrent reads after expiry are not de-duplicated and may each fetch;
/// the last response to arrive is the one kept.
pub struct MoenvClient<F = ReqwestFetcher> {
    fetcher: F,
    endpoint: String,
    cache: TimedCache<Vec<RegionalStationRecord>>,
}

#[bon]
impl<F: JsonFetcher> MoenvClient<F> {
    /// Creates a client.
    ///
    /// # Arguments
    ///
    /// * `.fetcher(F)`: **Required.** Transport used for requests.
    /// * `.endpoint(String)`: Optional. Defaults to [`MOENV_AQI_URL`].
    /// * `.cache_ttl(TimeDelta)`: Optional. Defaults to [`REGIONAL_CACHE_TTL_SECS`].
    /// * `.clock(Arc<dyn Clock>)`: Optional. Defaults to [`SystemClock`].
    #[builder]
    pub fn new(
        fetcher: F,
        endpoint: Option<String>,
        cache_ttl: Option<TimeDelta>,
        clock: Option<Arc<dyn Clock>>,
    ) -> Self {
        let ttl = cache_ttl.unwrap_or_else(|| TimeDelta::seconds(REGIONAL_CACHE_TTL_SECS));
        let clock = clock.unwrap_or_else(|| Arc::new(SystemClock));
        Self {
            fetcher,
            endpoint: endpoint.unwrap_or_else(|| MOENV_AQI_URL.to_string()),
            cache: TimedCache::new(ttl, clock),
        }
    }

    pub fn dataset_url(&self, api_key: &str) -> String {
        format!("{}?language=zh&api_key={}", self.endpoint, api_key)
    }

    /// When the cached dataset was last fetched, if ever.
    pub async fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.cache.fetched_at().await
    }

    /// Returns every station record, from cache when fresh.
    ///
    /// Two calls inside the cache window return the same `Arc`.
    ///
    /// # Errors
    ///
    /// * [`AqiError::NetworkRequest`], [`AqiError::HttpStatus`], [`AqiError::ResponseBody`]
    ///   if the transport fails.
    /// * [`AqiError::UnexpectedFormat`] if the body is neither an array of records nor an
    ///   object with a `records` array.
    ///
    /// The cache is left untouched on error.
    pub async fn fetch_all_aqi_data(
        &self,
        api_key: &str,
    ) -> Result<Arc<Vec<RegionalStationRecord>>, AqiError> {
        if let Some(records) = self.cache.get_fresh().await {
            info!("Cache hit for regional AQI dataset ({} stations)", records.len());
            return Ok(records);
        }

        info!(
            "Regional AQI dataset missing or older than {}s, fetching",
            self.cache.ttl().num_seconds()
        );
        let payload = self.fetcher.get_json(&self.dataset_url(api_key)).await?;
        let records = parse_regional_payload(payload)?;
        debug!("Parsed {} regional station records", records.len());

        Ok(self.cache.store(records).await)
    }

    /// Returns one station record from the (possibly cached) dataset.
    ///
    /// Lookup order:
    /// * `.station_name(&str)` given: the record whose name matches exactly.
    /// * else `.location(LatLon)` given: the record nearest to it (planar distance
    ///   on degrees; records with unparseable coordinates are skipped; first wins ties).
    /// * else: the first record.
    ///
    /// # Errors
    ///
    /// Anything [`fetch_all_aqi_data`](Self::fetch_all_aqi_data) returns, plus
    /// [`AqiError::StationNotFound`], [`AqiError::NoStationResolved`] or
    /// [`AqiError::NoDataAvailable`] for the three lookup modes respectively.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use airquality::{AqiError, LatLon, MoenvClient, ReqwestFetcher};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), AqiError> {
    /// let client = MoenvClient::builder().fetcher(ReqwestFetcher::new()).build();
    /// let near_taipei_101 = client
    ///     .fetch_aqi_data()
    ///     .api_key("my-key")
    ///     .location(LatLon(25.0340, 121.5645))
    ///     .call()
    ///     .await?;
    /// println!("{} ({}): AQI {}", near_taipei_101.site_name, near_taipei_101.county, near_taipei_101.aqi);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn fetch_aqi_data(
        &self,
        api_key: &str,
        station_name: Option<&str>,
        location: Option<LatLon>,
    ) -> Result<RegionalStationRecord, AqiError> {
        let records = self.fetch_all_aqi_data(api_key).await?;

        if let Some(name) = station_name {
            return records
                .iter()
                .find(|record| record.site_name == name)
                .cloned()
                .ok_or_else(|| AqiError::StationNotFound(name.to_string()));
        }

        if let Some(location) = location {
            return nearest_station(records.as_slice(), location)
                .map(|nearest| nearest.station.clone())
                .ok_or(AqiError::NoStationResolved {
                    lat: location.0,
                    lon: location.1,
                });
        }

        records.first().cloned().ok_or(AqiError::NoDataAvailable)
    }
}
