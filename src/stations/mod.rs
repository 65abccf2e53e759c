pub mod locate_station;
pub mod station_list;
