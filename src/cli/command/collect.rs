//! Fetch today's degree days for a location and append them to the CSV log.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::{cli::create_spinner, fetch::DataHubClient, store::CsvStore};

use super::default_data_dir;

pub async fn collect(
    api_key: &str,
    coords: &str,
    output: Option<PathBuf>,
    baseline: f64,
) -> Result<()> {
    let data_dir = output.unwrap_or_else(default_data_dir);

    println!("Degree Days Data Collector");
    println!("==========================");
    println!("Location: {coords}");
    println!("Output: {}", data_dir.display());
    println!();

    let client = DataHubClient::new(api_key)?.with_baseline(baseline);
    let store = CsvStore::new(data_dir);

    let bar = create_spinner("Fetching degree days data...".to_string());
    let reading = client.degree_days(coords).await?;
    bar.finish_with_message("Degree days data fetched");

    let bar = create_spinner("Saving to CSV...".to_string());
    let file_path = store.save(&reading)?;
    bar.finish_with_message("Saved to CSV");

    println!();
    println!("✓ Success!");
    println!("Date: {}", reading.date);
    println!("Location: {}", reading.location_name);
    println!("Avg Temperature: {}°C", reading.avg_temp);
    println!("Heating Degree Days: {}", reading.heating_degree_days);
    println!("Saved to: {}", file_name(&file_path));
    println!();

    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
