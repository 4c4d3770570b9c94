//! Outbound adapters: PostgreSQL persistence and the external
//! collaborators (geocoder, SMTP, photo storage).

pub mod geocode;
pub mod mail;
pub mod persistence;
pub mod photos;
