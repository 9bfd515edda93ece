//! Record transformation: key-path expansion and schema mapping.

pub mod expand;
pub mod schema;

pub use expand::expand_record;
pub use schema::{map_user, DEFAULT_NAME};
