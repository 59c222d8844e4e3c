pub mod engine;
pub mod snapshot;

pub use crate::domain::model::{Inventory, Textbook};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
