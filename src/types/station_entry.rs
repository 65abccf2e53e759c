use crate::types::regional_record::RegionalStationRecord;
use serde::{Deserialize, Serialize};

/// An `{id, name}` pair for populating a station picker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StationListEntry {
    pub id: String,
    pub name: String,
}

impl From<&RegionalStationRecord> for StationListEntry {
    // MOENV lookups are by name, so the name doubles as the id.
    fn from(record: &RegionalStationRecord) -> Self {
        StationListEntry {
            id: record.site_name.clone(),
            name: record.site_name.clone(),
        }
    }
}

/// An entry in the static station catalog file.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CatalogStation {
    pub uid: u64,
    pub name: String,
}

impl From<CatalogStation> for StationListEntry {
    fn from(station: CatalogStation) -> Self {
        StationListEntry {
            id: station.uid.to_string(),
            name: station.name,
        }
    }
}
