pub mod collect;
pub mod list;
pub mod show;

use std::path::PathBuf;

pub use collect::collect;
pub use list::list;
pub use show::show;

/// Directory the CSV log lands in when `--output` is not given: the platform
/// data directory, or `./data` where none is defined.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("degree-days"))
        .unwrap_or_else(|| PathBuf::from("data"))
}
