pub mod error;
pub mod listable;
pub mod models;

pub use error::*;
pub use listable::*;
pub use models::*;
