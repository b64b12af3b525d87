//! List the CSV logs in the data directory.

use std::path::PathBuf;

use anyhow::Result;

use crate::store::CsvStore;

use super::default_data_dir;

pub fn list(output: Option<PathBuf>) -> Result<()> {
    let data_dir = output.unwrap_or_else(default_data_dir);
    let store = CsvStore::new(&data_dir);

    let files = store.list()?;
    if files.is_empty() {
        println!("No CSV logs in `{}`", data_dir.display());
    } else {
        for file in files {
            println!("{file}");
        }
    }

    Ok(())
}
