//! Domain layer for the Filter Registry.

mod policy;
mod registry;

pub use policy::ToggleAuthorization;
pub use registry::FilterRegistry;
