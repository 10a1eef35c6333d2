pub mod location;
pub mod name;

pub use location::{normalize_city, normalize_state, UsState};
pub use name::normalize_name;
