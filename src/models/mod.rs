pub mod series;
pub mod snapshot;

pub use series::*;
pub use snapshot::*;
