mod container;
mod entry;
mod error;
pub mod geosite;
mod interface;
pub mod registry;

pub use container::Container;
pub use entry::{canonical_name, Entry};
pub use error::{Error, Result};
pub use interface::*;
pub use registry::Registry;

pub mod config {
    pub use serde_json::{self, from_value, Value};
}
