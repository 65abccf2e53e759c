mod air_quality;
mod cache;
mod clients;
mod error;
mod http;
mod stations;
mod tools;
mod types;

pub use air_quality::*;
pub use error::{AqiError, ErrorKind};

pub use cache::clock::{Clock, ManualClock, SystemClock};
pub use clients::moenv_client::*;
pub use clients::waqi_client::*;
pub use http::fetcher::{JsonFetcher, ReqwestFetcher};

pub use stations::locate_station::{nearest_station, Located, NearestStation};
pub use stations::station_list::*;
pub use tools::registry::*;

pub use types::aqi_level::AqiLevel;
pub use types::aqi_reading::{AqiReading, Pollutant, Pollutants};
pub use types::regional_record::RegionalStationRecord;
pub use types::station_entry::StationListEntry;
