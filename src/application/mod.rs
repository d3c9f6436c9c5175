pub mod booking;
mod deps;
pub mod item;

pub use deps::ServiceDependencies;
