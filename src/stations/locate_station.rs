use crate::types::regional_record::RegionalStationRecord;
use crate::LatLon;
use haversine::{distance, Location as HaversineLocation, Units};
use ordered_float::OrderedFloat;

/// Anything with a (possibly missing) position that can take part in a
/// nearest-station search.
pub trait Located {
    fn coordinates(&self) -> Option<LatLon>;
}

impl Located for RegionalStationRecord {
    fn coordinates(&self) -> Option<LatLon> {
        RegionalStationRecord::coordinates(self)
    }
}

impl Located for LatLon {
    fn coordinates(&self) -> Option<LatLon> {
        Some(*self)
    }
}

/// The result of a nearest-station search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestStation<'a, S> {
    pub station: &'a S,
    pub location: LatLon,
    /// Planar distance in degrees; this is what the search minimises.
    pub distance_degrees: f64,
    /// Great-circle distance, for display only.
    pub distance_km: f64,
}

/// Finds the station closest to `target`.
///
/// Distance is straight-line Euclidean distance on raw latitude/longitude
/// degrees, not a geodesic. Stations without usable coordinates are skipped.
/// When two stations are equally close, the one that appears first wins.
///
/// Returns `None` if no station has coordinates or if `target` is not a
/// finite coordinate.
///
/// # Examples
///
/// ```rust
/// use airquality::{nearest_station, LatLon};
///
/// let stations = [LatLon(0.0, 0.0), LatLon(1.0, 1.0), LatLon(5.0, 5.0)];
/// let nearest = nearest_station(&stations, LatLon(0.1, 0.1)).unwrap();
/// assert_eq!(*nearest.station, LatLon(0.0, 0.0));
/// ```
pub fn nearest_station<S: Located>(
    stations: &[S],
    target: LatLon,
) -> Option<NearestStation<'_, S>> {
    if !(target.0.is_finite() && target.1.is_finite()) {
        return None;
    }
    let (station, location, dist) = stations
        .iter()
        .filter_map(|station| station.coordinates().map(|loc| (station, loc)))
        .map(|(station, loc)| (station, loc, planar_distance(loc, target)))
        // min_by_key keeps the first of equal minima
        .min_by_key(|(_, _, dist)| OrderedFloat(*dist))?;

    Some(NearestStation {
        station,
        location,
        distance_degrees: dist,
        distance_km: great_circle_km(location, target),
    })
}

fn planar_distance(a: LatLon, b: LatLon) -> f64 {
    let d_lat = a.0 - b.0;
    let d_lon = a.1 - b.1;
    (d_lat * d_lat + d_lon * d_lon).sqrt()
}

fn great_circle_km(a: LatLon, b: LatLon) -> f64 {
    distance(
        HaversineLocation {
            latitude: a.0,
            longitude: a.1,
        },
        HaversineLocation {
            latitude: b.0,
            longitude: b.1,
        },
        Units::Kilometers,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, lat: &str, lon: &str) -> RegionalStationRecord {
        RegionalStationRecord {
            site_name: name.to_string(),
            latitude: lat.to_string(),
            longitude: lon.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_picks_closest_record() {
        let records = vec![
            record("origin", "0", "0"),
            record("one", "1", "1"),
            record("five", "5", "5"),
        ];
        let nearest = nearest_station(&records, LatLon(0.1, 0.1)).unwrap();
        assert_eq!(nearest.station.site_name, "origin");
        assert_eq!(nearest.location, LatLon(0.0, 0.0));
        assert!((nearest.distance_degrees - 0.02f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_first_record_wins_ties() {
        let records = vec![
            record("far", "9", "9"),
            record("north", "1", "0"),
            record("east", "0", "1"),
        ];
        let nearest = nearest_station(&records, LatLon(0.0, 0.0)).unwrap();
        assert_eq!(nearest.station.site_name, "north");
    }

    #[test]
    fn test_skips_unparseable_coordinates() {
        let records = vec![
            record("broken", "", "121.5"),
            record("dash", "-", "-"),
            record("valid", "25.0", "121.0"),
        ];
        let nearest = nearest_station(&records, LatLon(25.0, 121.5)).unwrap();
        assert_eq!(nearest.station.site_name, "valid");
    }

    #[test]
    fn test_none_without_coordinates() {
        let records = vec![record("broken", "abc", "def")];
        assert!(nearest_station(&records, LatLon(0.0, 0.0)).is_none());
        let empty: Vec<RegionalStationRecord> = vec![];
        assert!(nearest_station(&empty, LatLon(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_none_for_non_finite_target() {
        let records = vec![record("origin", "0", "0"), record("one", "1", "1")];
        assert!(nearest_station(&records, LatLon(f64::NAN, 0.0)).is_none());
        assert!(nearest_station(&records, LatLon(0.0, f64::INFINITY)).is_none());
    }

    #[test]
    fn test_reports_great_circle_distance() {
        // Banqiao to Taipei Main Station is roughly 7 km.
        let records = vec![record("板橋", "25.012972", "121.458667")];
        let nearest = nearest_station(&records, LatLon(25.0478, 121.5170)).unwrap();
        assert!(nearest.distance_km > 5.0 && nearest.distance_km < 9.0);
    }
}
