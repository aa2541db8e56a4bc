pub mod guestbook;
pub mod ping;
