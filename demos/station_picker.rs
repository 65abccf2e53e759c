use airquality::{AirQuality, AqiError, StationSource, ToolRegistry};
use std::env;

#[tokio::main]
async fn main() -> Result<(), AqiError> {
    let air: AirQuality = AirQuality::default();

    match air.load_stations(StationSource::Catalog).await {
        Ok(stations) => println!("Catalog has {} stations", stations.len()),
        Err(e) => println!("Catalog unavailable ({}): {}", e.kind(), e),
    }

    let api_key = env::var("MOENV_API_KEY").unwrap_or_default();
    let stations = air
        .load_stations(StationSource::Regional { api_key: &api_key })
        .await?;
    for station in stations.iter().take(10) {
        println!("{} => {}", station.id, station.name);
    }

    let mut tools = ToolRegistry::new();
    tools.toggle_detached("aqi");
    for tool in tools.tools() {
        println!("{} ({}): active={} detached={}", tool.name, tool.id, tool.active, tool.detached);
    }

    Ok(())
}
