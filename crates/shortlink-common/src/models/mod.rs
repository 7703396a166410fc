//! Wire types for every admin API resource.
//!
//! Field names follow the backend's camelCase JSON. The client core treats
//! these as opaque payloads; they are typed so call sites can use them.

pub mod group;
pub mod link;
pub mod location;
pub mod recycle;
pub mod stats;
pub mod user;
pub mod view;

pub use group::*;
pub use link::*;
pub use location::*;
pub use recycle::*;
pub use stats::*;
pub use user::*;
pub use view::*;
