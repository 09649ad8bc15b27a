pub mod filter;
pub mod pagination;

pub use filter::*;
pub use pagination::*;
