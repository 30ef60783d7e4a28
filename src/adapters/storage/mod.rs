//! Price Storage Adapters
//!
//! Implementations of the `PriceStore` port:
//! - `InMemoryPriceStore`: process-local map, used by tests and one-shot runs
//! - `JsonFilePriceStore`: one pretty-printed JSON document per symbol

mod json_file;
mod memory;

pub use json_file::{JsonFilePriceStore, StoredSeries};
pub use memory::InMemoryPriceStore;
