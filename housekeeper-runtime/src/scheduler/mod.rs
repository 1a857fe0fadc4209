mod builder;
mod handle;
mod housekeeper;
mod worker;

pub use builder::HousekeeperBuilder;
pub use handle::HousekeeperHandle;
pub use housekeeper::{Housekeeper, LoopState, WeakHousekeeper};
