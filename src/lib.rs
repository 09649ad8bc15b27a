//! # QuickList
//!
//! Generic paginated-listing protocol for learning-content catalogs: a
//! server-side pagination engine and a client-side incremental list
//! controller sharing one page envelope.
//!
//! ## Architecture
//!
//! - **shared**: the envelope (`PageRequest`/`PageResult`) and filter types
//!   both halves agree on
//! - **domain**: error taxonomy, the `Listable` record trait, catalog models
//! - **engine**: translates a page request into one windowed storage read
//! - **store**: the storage collaborator boundary plus the in-memory backend
//! - **controller**: fetch/accumulate/debounce/exhaustion state machine for
//!   infinite-scroll screens
//! - **config**: TOML application configuration

pub mod config;
pub mod controller;
pub mod domain;
pub mod engine;
pub mod shared;
pub mod store;

pub use config::{default_config_path, init_tracing, AppConfig};
pub use controller::{
    ControllerConfig, FetchOutcome, ListClient, ListController, ListEvent, ListEventSubscriber,
};
pub use domain::{
    Lesson, LessonFilter, ListError, ListResult, Listable, User, UserFilter, UserType,
};
pub use engine::{ListEndpoint, ListEngine};
pub use shared::{FieldValue, FilterSet, PageRequest, PageResult, SortOrder};
pub use store::{ListStore, MemoryStore, OrderBy, StoreQuery};
