//! Axum handlers for the §4.1 endpoint table.

pub mod ask_owner;
pub mod google;
pub mod owner_message;
pub mod pending;
pub mod reply;
pub mod route;
