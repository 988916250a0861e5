mod collect;
mod mock;
mod parse;
mod record;

pub use collect::{DataSource, collect_dataset};
pub use record::{CategoryStats, Dataset, ResourceKind, ResourceRecord};
