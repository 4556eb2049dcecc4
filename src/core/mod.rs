// Public modules
pub mod callback;
pub mod date;
pub mod deep;
pub mod defaults;
pub mod error;
pub mod inherit;
pub mod json;
pub mod namespace;
pub mod rehash;

// Internal modules - not part of public API
pub(crate) mod paths;

// Re-export common types for convenience
pub use callback::{discard_event, event_proxy, EventProxy};
pub use date::{ensure_date, ensure_time, floor_date, DateInput, Floor};
pub use deep::{deep_get, deep_set, DeepPath};
pub use error::{Error, ErrorCode, Result};
pub use inherit::{inherit, Class, Instance};
pub use namespace::{namespace, Registry};
pub use rehash::{rehash, Grouped, RehashOptions, Rehashed};
