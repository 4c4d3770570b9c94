//! Campfinder backend library.
//!
//! Hexagonal layout: `domain` holds the entities, validation, and services;
//! `inbound` exposes the REST surface; `outbound` implements the persistence
//! and collaborator ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
