pub mod docs;
pub mod guestbook;
pub mod health;
pub mod session;
