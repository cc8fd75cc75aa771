//! # Slotbook Core
//!
//! Domain types and booking rules shared by the storage and HTTP crates:
//!
//! - **Models**: users, services, weekly availability and bookings
//! - **Slots**: bookable start time computation
//! - **Guard**: the conflict check performed before a booking is stored
//! - **Repository**: storage traits implemented by `slotbook-db`

pub mod errors;
pub mod guard;
pub mod models;
pub mod repository;
pub mod slots;
