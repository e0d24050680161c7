pub mod model;
pub mod pool;

pub use model::Transfer;
pub use pool::{PoolSnapshot, TransferPool};
