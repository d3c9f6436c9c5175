pub mod booking;
pub mod commands;
pub mod comment;
pub mod state;
pub mod value_objects;

pub use booking::*;
pub use comment::*;
pub use state::*;
pub use value_objects::*;
