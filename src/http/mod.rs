pub mod extract;
pub mod routing;
pub mod types;
