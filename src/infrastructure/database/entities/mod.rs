//! Database entities

pub mod booking;
pub mod booking_document;
pub mod service;
pub mod user;
