pub mod providers;
pub mod staging;

pub use staging::Staging;
