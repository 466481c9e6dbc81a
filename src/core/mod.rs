pub mod parser;
pub mod pipeline;
pub mod render;
pub mod sources;
pub mod updater;

pub use crate::domain::model::{DomainSet, Harvest, HostsDocument};
pub use crate::domain::ports::{ConfigProvider, HostSource, Pipeline, Storage};
pub use crate::utils::error::Result;
