pub mod item_directory;
pub mod user_directory;

#[allow(unused_imports)]
pub use item_directory::ItemDirectory;
#[allow(unused_imports)]
pub use user_directory::UserDirectory;
