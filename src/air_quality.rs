//! This module provides the main entry point of the crate. [`AirQuality`] owns
//! both provider clients, the regional dataset cache and the station catalog,
//! and exposes every retrieval operation in one place.

use crate::cache::clock::Clock;
use crate::clients::moenv_client::MoenvClient;
use crate::clients::waqi_client::{FeedSelector, WaqiClient};
use crate::error::AqiError;
use crate::http::fetcher::{JsonFetcher, ReqwestFetcher};
use crate::stations::locate_station::nearest_station;
use crate::stations::station_list::{
    CatalogStationLoader, RegionalStationLoader, StationListLoader, DEFAULT_CATALOG_PATH,
};
use crate::types::aqi_reading::AqiReading;
use crate::types::regional_record::RegionalStationRecord;
use crate::types::station_entry::StationListEntry;
use bon::bon;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use airquality::LatLon;
///
/// let taipei_101 = LatLon(25.0340, 121.5645);
/// assert_eq!(taipei_101.0, 25.0340); // Latitude
/// assert_eq!(taipei_101.1, 121.5645); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

/// Where a station picker list comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationSource<'a> {
    /// The static catalog file, read once.
    Catalog,
    /// Every station in the regional MOENV dataset.
    Regional { api_key: &'a str },
}

/// A regional station record together with how far it is from the query point.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionalMatch {
    pub record: RegionalStationRecord,
    /// Great-circle distance from the query point.
    pub distance_km: f64,
}

/// The main client for AQI retrieval.
///
/// Create one with [`AirQuality::default()`] for the public endpoints and
/// `reqwest`, or with [`AirQuality::builder()`] to override the transport, the
/// clock, the regional cache window, the catalog path or the endpoints.
///
/// The regional cache and the catalog cache belong to this instance; share the
/// instance (e.g. behind an `Arc`) rather than creating one per request.
///
/// # Examples
///
/// ```no_run
/// use airquality::{AirQuality, AqiError, FeedSelector};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), AqiError> {
/// let air: AirQuality = AirQuality::default();
/// let reading = air.global_reading("my-token", FeedSelector::Here).await?;
/// println!("{}: AQI {} ({:?})", reading.station_name, reading.aqi, reading.level());
/// # Ok(())
/// # }
/// ```
pub struct AirQuality<F = ReqwestFetcher> {
    waqi: WaqiClient<F>,
    moenv: Arc<MoenvClient<F>>,
    catalog: CatalogStationLoader,
}

#[bon]
impl<F: JsonFetcher + Clone> AirQuality<F> {
    /// Creates a client with explicit options.
    ///
    /// # Arguments
    ///
    /// * `.fetcher(F)`: **Required.** Transport shared by both providers.
    /// * `.clock(Arc<dyn Clock>)`: Optional. Time source for the regional cache. Defaults to the system clock.
    /// * `.regional_cache_ttl(TimeDelta)`: Optional. Regional cache window. Defaults to five minutes.
    /// * `.catalog_path(PathBuf)`: Optional. Static station catalog. Defaults to [`DEFAULT_CATALOG_PATH`].
    /// * `.waqi_base_url(String)`: Optional. Defaults to [`WAQI_BASE_URL`](crate::WAQI_BASE_URL).
    /// * `.moenv_endpoint(String)`: Optional. Defaults to [`MOENV_AQI_URL`](crate::MOENV_AQI_URL).
    #[builder]
    pub fn new(
        fetcher: F,
        clock: Option<Arc<dyn Clock>>,
        regional_cache_ttl: Option<TimeDelta>,
        catalog_path: Option<PathBuf>,
        waqi_base_url: Option<String>,
        moenv_endpoint: Option<String>,
    ) -> Self {
        let waqi = WaqiClient::builder()
            .fetcher(fetcher.clone())
            .maybe_base_url(waqi_base_url)
            .build();
        let moenv = MoenvClient::builder()
            .fetcher(fetcher)
            .maybe_endpoint(moenv_endpoint)
            .maybe_cache_ttl(regional_cache_ttl)
            .maybe_clock(clock)
            .build();
        let catalog = CatalogStationLoader::new(
            catalog_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH)),
        );
        Self {
            waqi,
            moenv: Arc::new(moenv),
            catalog,
        }
    }

    pub fn waqi(&self) -> &WaqiClient<F> {
        &self.waqi
    }

    pub fn moenv(&self) -> &Arc<MoenvClient<F>> {
        &self.moenv
    }

    /// Fetches one reading from WAQI. See [`WaqiClient::fetch_aqi_data`].
    pub async fn global_reading(
        &self,
        token: &str,
        selector: FeedSelector,
    ) -> Result<AqiReading, AqiError> {
        self.waqi.fetch_aqi_data(token, selector).await
    }

    /// Returns the whole regional dataset. See [`MoenvClient::fetch_all_aqi_data`].
    pub async fn regional_dataset(
        &self,
        api_key: &str,
    ) -> Result<Arc<Vec<RegionalStationRecord>>, AqiError> {
        self.moenv.fetch_all_aqi_data(api_key).await
    }

    /// Returns one regional record by name, by nearest location, or the first
    /// record. See [`MoenvClient::fetch_aqi_data`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use airquality::{AirQuality, AqiError};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), AqiError> {
    /// let air: AirQuality = AirQuality::default();
    /// let banqiao = air
    ///     .regional_reading()
    ///     .api_key("my-key")
    ///     .station_name("板橋")
    ///     .call()
    ///     .await?;
    /// println!("{}: {} ({})", banqiao.site_name, banqiao.aqi, banqiao.status);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn regional_reading(
        &self,
        api_key: &str,
        station_name: Option<&str>,
        location: Option<LatLon>,
    ) -> Result<RegionalStationRecord, AqiError> {
        self.moenv
            .fetch_aqi_data()
            .api_key(api_key)
            .maybe_station_name(station_name)
            .maybe_location(location)
            .call()
            .await
    }

    /// Like [`regional_reading`](Self::regional_reading) with a location, but
    /// also reports the distance to the chosen station.
    ///
    /// # Errors
    ///
    /// [`AqiError::NoStationResolved`] if no record has usable coordinates,
    /// plus anything the regional fetch returns.
    pub async fn nearest_regional_station(
        &self,
        api_key: &str,
        location: LatLon,
    ) -> Result<RegionalMatch, AqiError> {
        let records = self.moenv.fetch_all_aqi_data(api_key).await?;
        nearest_station(records.as_slice(), location)
            .map(|nearest| RegionalMatch {
                record: nearest.station.clone(),
                distance_km: nearest.distance_km,
            })
            .ok_or(AqiError::NoStationResolved {
                lat: location.0,
                lon: location.1,
            })
    }

    /// Loads a station picker list from `source`.
    pub async fn load_stations(
        &self,
        source: StationSource<'_>,
    ) -> Result<Vec<StationListEntry>, AqiError> {
        match source {
            StationSource::Catalog => self.catalog.load_stations().await,
            StationSource::Regional { api_key } => {
                RegionalStationLoader::new(Arc::clone(&self.moenv), api_key)
                    .load_stations()
                    .await
            }
        }
    }
}

impl Default for AirQuality<ReqwestFetcher> {
    fn default() -> Self {
        AirQuality::builder().fetcher(ReqwestFetcher::new()).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::clock::ManualClock;
    use crate::http::fake::FakeFetcher;
    use crate::ErrorKind;
    use chrono::Utc;
    use serde_json::json;
    use std::io::Write;

    fn regional_payload() -> serde_json::Value {
        json!({
            "total": "3",
            "records": [
                { "sitename": "基隆", "county": "基隆市", "aqi": "30", "latitude": "25.129167", "longitude": "121.760056" },
                { "sitename": "板橋", "county": "新北市", "aqi": "48", "latitude": "25.012972", "longitude": "121.458667" },
                { "sitename": "小港", "county": "高雄市", "aqi": "112", "latitude": "22.565833", "longitude": "120.337736" }
            ]
        })
    }

    fn air_quality(fetcher: &FakeFetcher, clock: Arc<ManualClock>) -> AirQuality<FakeFetcher> {
        AirQuality::builder()
            .fetcher(fetcher.clone())
            .clock(clock as Arc<dyn Clock>)
            .waqi_base_url("https://waqi.test".to_string())
            .moenv_endpoint("https://moenv.test/aqx".to_string())
            .build()
    }

    #[tokio::test]
    async fn test_routes_to_configured_endpoints() -> Result<(), AqiError> {
        let fetcher = FakeFetcher::new();
        let air = air_quality(&fetcher, Arc::new(ManualClock::new(Utc::now())));

        fetcher.push_json(json!({
            "status": "ok",
            "data": {
                "aqi": 12,
                "city": { "name": "Keelung", "geo": [25.13, 121.76] },
                "time": { "s": "2024-03-01 14:00:00", "tz": "+08:00" }
            }
        }));
        fetcher.push_json(regional_payload());

        air.global_reading("tok", FeedSelector::Geo(LatLon(25.1, 121.7)))
            .await?;
        air.regional_dataset("key").await?;

        assert_eq!(
            fetcher.requests(),
            vec![
                "https://waqi.test/feed/geo:25.1;121.7/?token=tok".to_string(),
                "https://moenv.test/aqx?language=zh&api_key=key".to_string(),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_regional_reading_and_station_list_share_cache() -> Result<(), AqiError> {
        let fetcher = FakeFetcher::new();
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let air = air_quality(&fetcher, clock.clone());
        fetcher.push_json(regional_payload());

        let record = air
            .regional_reading()
            .api_key("key")
            .location(LatLon(25.0, 121.5))
            .call()
            .await?;
        assert_eq!(record.site_name, "板橋");

        let stations = air
            .load_stations(StationSource::Regional { api_key: "key" })
            .await?;
        let names: Vec<&str> = stations.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["基隆", "板橋", "小港"]);
        assert_eq!(fetcher.request_count(), 1);

        clock.advance(TimeDelta::minutes(5));
        fetcher.push_json(regional_payload());
        air.load_stations(StationSource::Regional { api_key: "key" })
            .await?;
        assert_eq!(fetcher.request_count(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_nearest_regional_station_reports_distance() -> Result<(), AqiError> {
        let fetcher = FakeFetcher::new();
        let air = air_quality(&fetcher, Arc::new(ManualClock::new(Utc::now())));
        fetcher.push_json(regional_payload());

        let found = air
            .nearest_regional_station("key", LatLon(22.6, 120.3))
            .await?;
        assert_eq!(found.record.site_name, "小港");
        assert!(found.distance_km < 10.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_catalog_source() -> Result<(), AqiError> {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(br#"[{"uid": 1624, "name": "Taipei"}]"#)
            .expect("write catalog");

        let fetcher = FakeFetcher::new();
        let air = AirQuality::builder()
            .fetcher(fetcher.clone())
            .catalog_path(file.path().to_path_buf())
            .build();
        let stations = air.load_stations(StationSource::Catalog).await?;
        assert_eq!(stations[0].id, "1624");
        assert_eq!(fetcher.request_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_regional_dataset() {
        let fetcher = FakeFetcher::new();
        let air = air_quality(&fetcher, Arc::new(ManualClock::new(Utc::now())));
        fetcher.push_json(json!([]));
        let err = air
            .regional_reading()
            .api_key("key")
            .call()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoDataAvailable);
    }
}
