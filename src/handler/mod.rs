pub mod account;
pub mod reservation;
pub mod send_push;
