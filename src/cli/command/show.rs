//! Print a CSV log back to the operator.

use std::path::PathBuf;

use anyhow::Result;

use crate::store::{CsvStore, LOG_FILE_NAME};

use super::default_data_dir;

pub fn show(file: Option<String>, output: Option<PathBuf>) -> Result<()> {
    let data_dir = output.unwrap_or_else(default_data_dir);
    let store = CsvStore::new(data_dir);

    let filename = file.unwrap_or_else(|| LOG_FILE_NAME.to_string());
    let content = store.read(&filename)?;
    print!("{content}");

    Ok(())
}
