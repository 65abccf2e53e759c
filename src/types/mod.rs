pub mod aqi_level;
pub mod aqi_reading;
pub mod regional_record;
pub mod station_entry;
