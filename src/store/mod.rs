pub mod memory;
pub mod traits;

pub use memory::MemoryStore;
pub use traits::{ListStore, OrderBy, StoreQuery};
