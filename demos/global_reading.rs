use airquality::{AirQuality, AqiError, FeedSelector, LatLon};
use std::env;

#[tokio::main]
async fn main() -> Result<(), AqiError> {
    let token = env::var("WAQI_TOKEN").unwrap_or_else(|_| "demo".to_string());
    let air: AirQuality = AirQuality::default();

    for selector in [
        FeedSelector::Here,
        FeedSelector::Station(1624.0),
        FeedSelector::Geo(LatLon(25.0340, 121.5645)),
    ] {
        match air.global_reading(&token, selector).await {
            Ok(reading) => {
                println!(
                    "[{}] {} at {}: AQI {} ({})",
                    selector,
                    reading.station_name,
                    reading.observed_at,
                    reading.aqi,
                    reading.level().map(|l| l.label()).unwrap_or("unknown")
                );
                for (pollutant, value) in reading.pollutants.iter() {
                    println!("    {:>4}: {}", pollutant, value);
                }
            }
            Err(e) => println!("[{}] failed ({}): {}", selector, e.kind(), e),
        }
    }

    Ok(())
}
