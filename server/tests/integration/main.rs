mod guestbook;
mod helpers;
mod ping;
mod routing;
