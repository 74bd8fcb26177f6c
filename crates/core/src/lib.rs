pub mod batch;
pub mod config;
pub mod error;
pub mod record;

pub use batch::{Batch, EntitySlice};
pub use config::Config;
pub use error::*;
pub use record::*;
