//! Typed OHLCV records and the CSV loader that produces them

mod bar;
pub mod loader;

pub use bar::{Dataset, PriceBar};
pub use loader::{LoadedDataset, load_path, load_reader, parse_levels};
