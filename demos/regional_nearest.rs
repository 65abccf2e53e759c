use airquality::{AirQuality, AqiError, LatLon};
use std::env;

#[tokio::main]
async fn main() -> Result<(), AqiError> {
    let api_key = env::var("MOENV_API_KEY").unwrap_or_default();
    let air: AirQuality = AirQuality::default();

    let taipei_101 = LatLon(25.0340, 121.5645);
    let found = air.nearest_regional_station(&api_key, taipei_101).await?;
    let record = &found.record;

    println!(
        "{} ({}), {:.1} km away: AQI {} [{}], PM2.5 {}, published {}",
        record.site_name,
        record.county,
        found.distance_km,
        record.aqi,
        record.level().map(|l| l.label()).unwrap_or("unknown"),
        record.pm2_5,
        record.publish_time
    );

    // Served from the regional cache, no second request.
    let banqiao = air
        .regional_reading()
        .api_key(&api_key)
        .station_name("板橋")
        .call()
        .await?;
    println!("{}: AQI {} ({})", banqiao.site_name, banqiao.aqi, banqiao.status);

    Ok(())
}
