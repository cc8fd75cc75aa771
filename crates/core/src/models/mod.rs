pub mod availability;
pub mod booking;
pub mod clock;
pub mod service;
pub mod user;
