//! Generic helpers shared across the Shuffle provider crates.
//!
//! - [`mapper`]: flattens typed domain records into the untyped key/value
//!   trees the configuration framework consumes.
//! - [`schema`]: status propagation over declarative schema trees, as
//!   immutable transforms.
//! - [`ids`]: random identifier generation for locally assigned app ids.

pub mod ids;
pub mod mapper;
pub mod schema;

pub use ids::random_hex_id;
pub use mapper::{Mappable, ValueTree, tree_from_value};
pub use schema::{SchemaPathError, with_status, with_status_at, with_status_overrides};
