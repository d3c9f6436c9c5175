pub mod booking_store;
pub mod comment_store;

#[allow(unused_imports)]
pub use booking_store::BookingStore as PostgresBookingStore;
#[allow(unused_imports)]
pub use comment_store::CommentStore as PostgresCommentStore;
