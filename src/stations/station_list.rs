//! Station picker lists. Two interchangeable sources share the
//! [`StationListLoader`] contract: a static catalog file, and a projection of
//! the regional MOENV dataset.

use crate::clients::moenv_client::MoenvClient;
use crate::error::AqiError;
use crate::http::fetcher::JsonFetcher;
use crate::types::station_entry::{CatalogStation, StationListEntry};
use log::info;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Default location of the static station catalog.
pub const DEFAULT_CATALOG_PATH: &str = "taiwan-stations.json";

/// Produces the `{id, name}` list for a station picker.
pub trait StationListLoader {
    fn load_stations(
        &self,
    ) -> impl Future<Output = Result<Vec<StationListEntry>, AqiError>> + Send;
}

/// Loads stations from a JSON file shaped `[{"uid": 1624, "name": "..."}]`.
///
/// The file is read once and kept for the lifetime of the loader. A failed
/// read is not remembered; the next call tries again.
#[derive(Debug)]
pub struct CatalogStationLoader {
    path: PathBuf,
    stations: OnceCell<Vec<StationListEntry>>,
}

impl CatalogStationLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            stations: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_catalog(&self) -> Result<Vec<StationListEntry>, AqiError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| AqiError::CatalogRead(self.path.clone(), e))?;
        let stations: Vec<CatalogStation> = serde_json::from_slice(&bytes).map_err(|e| {
            AqiError::unexpected_format(
                "station catalog",
                format!("{}: {}", self.path.display(), e),
            )
        })?;
        info!(
            "Loaded {} stations from catalog {}",
            stations.len(),
            self.path.display()
        );
        Ok(stations.into_iter().map(StationListEntry::from).collect())
    }
}

impl Default for CatalogStationLoader {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_PATH)
    }
}

impl StationListLoader for CatalogStationLoader {
    async fn load_stations(&self) -> Result<Vec<StationListEntry>, AqiError> {
        self.stations
            .get_or_try_init(|| self.read_catalog())
            .await
            .cloned()
    }
}

/// Derives the list from the regional dataset, one entry per record with the
/// station name as both id and name.
///
/// No caching of its own: freshness follows the [`MoenvClient`] cache.
pub struct RegionalStationLoader<F> {
    client: Arc<MoenvClient<F>>,
    api_key: String,
}

impl<F: JsonFetcher> RegionalStationLoader<F> {
    pub fn new(client: Arc<MoenvClient<F>>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }
}

impl<F: JsonFetcher> StationListLoader for RegionalStationLoader<F> {
    async fn load_stations(&self) -> Result<Vec<StationListEntry>, AqiError> {
        let records = self.client.fetch_all_aqi_data(&self.api_key).await?;
        Ok(records.iter().map(StationListEntry::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::fake::FakeFetcher;
    use crate::ErrorKind;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn catalog_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write catalog");
        file.flush().expect("flush catalog");
        file
    }

    #[tokio::test]
    async fn test_catalog_projects_uid_and_name() -> Result<(), AqiError> {
        let file = catalog_file(r#"[{"uid": 1624, "name": "Taipei"}, {"uid": 7, "name": "Banqiao"}]"#);
        let loader = CatalogStationLoader::new(file.path());
        let stations = loader.load_stations().await?;
        assert_eq!(
            stations,
            vec![
                StationListEntry { id: "1624".into(), name: "Taipei".into() },
                StationListEntry { id: "7".into(), name: "Banqiao".into() },
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_catalog_is_read_once() -> Result<(), AqiError> {
        let file = catalog_file(r#"[{"uid": 1, "name": "First"}]"#);
        let path = file.path().to_path_buf();
        let loader = CatalogStationLoader::new(&path);
        let first = loader.load_stations().await?;

        // Removing the file does not matter once it has been loaded.
        drop(file);
        assert!(!path.exists());
        let second = loader.load_stations().await?;
        assert_eq!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_catalog_is_fetch_failure_and_not_cached() -> Result<(), AqiError> {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("stations.json");
        let loader = CatalogStationLoader::new(&path);

        let err = loader.load_stations().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FetchFailure);

        std::fs::write(&path, r#"[{"uid": 2, "name": "Later"}]"#).expect("write catalog");
        let stations = loader.load_stations().await?;
        assert_eq!(stations[0].name, "Later");
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_catalog_is_unexpected_format() {
        let file = catalog_file(r#"{"stations": []}"#);
        let loader = CatalogStationLoader::new(file.path());
        let err = loader.load_stations().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedFormat);
    }

    #[tokio::test]
    async fn test_regional_projection_uses_names() -> Result<(), AqiError> {
        let fetcher = FakeFetcher::new();
        fetcher.push_json(json!([
            { "sitename": "板橋", "latitude": "25.01", "longitude": "121.45" },
            { "sitename": "士林", "latitude": "25.10", "longitude": "121.51" }
        ]));
        let client = Arc::new(MoenvClient::builder().fetcher(fetcher.clone()).build());
        let loader = RegionalStationLoader::new(client, "key");

        let stations = loader.load_stations().await?;
        assert_eq!(
            stations,
            vec![
                StationListEntry { id: "板橋".into(), name: "板橋".into() },
                StationListEntry { id: "士林".into(), name: "士林".into() },
            ]
        );

        // Within the regional cache window the projection is served from cache.
        loader.load_stations().await?;
        assert_eq!(fetcher.request_count(), 1);
        Ok(())
    }

    #[test]
    fn test_default_catalog_path() {
        assert_eq!(
            CatalogStationLoader::default().path(),
            Path::new(DEFAULT_CATALOG_PATH)
        );
    }
}
