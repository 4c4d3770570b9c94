//! Ports: traits the domain drives and adapters implement.
//!
//! Repositories expose typed CRUD plus aggregate operations per entity
//! against an injected database handle; collaborator ports wrap the
//! geocoding, mail, and photo-storage providers. Inbound code never sees a
//! concrete adapter.

mod bootcamp_repository;
mod course_repository;
mod geocoder;
mod mailer;
mod photo_store;
mod review_repository;
mod user_repository;

pub use bootcamp_repository::BootcampRepository;
pub use course_repository::{CourseListItem, CourseRepository};
pub use geocoder::{GeocodeError, GeocodedAddress, Geocoder};
pub use mailer::{MailError, Mailer};
pub use photo_store::{PhotoStore, PhotoStoreError};
pub use review_repository::{ReviewListItem, ReviewRepository};
pub use user_repository::UserRepository;

use crate::domain::Error;

/// Failures raised by repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store connection could not be established or checked out.
    #[error("store connection failed: {message}")]
    Connection {
        /// Adapter-level detail, logged but not shown to clients.
        message: String,
    },
    /// A query or mutation failed during execution.
    #[error("store query failed: {message}")]
    Query {
        /// Adapter-level detail, logged but not shown to clients.
        message: String,
    },
    /// A uniqueness constraint was violated.
    #[error("duplicate value for field '{field}'")]
    Duplicate {
        /// The duplicated column or field name.
        field: String,
    },
    /// A list query referenced an unknown field or carried a malformed value.
    #[error("{message}")]
    InvalidQuery {
        /// Client-facing description of the problem.
        message: String,
    },
}

impl StoreError {
    /// Connection-level failure.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Query-level failure.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Uniqueness violation on `field`.
    pub fn duplicate(field: impl Into<String>) -> Self {
        Self::Duplicate {
            field: field.into(),
        }
    }

    /// Rejected list-query input.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { field } => {
                Self::invalid_request(format!("Duplicate value entered for '{field}'"))
            }
            StoreError::InvalidQuery { message } => Self::invalid_request(message),
            StoreError::Connection { message } | StoreError::Query { message } => {
                tracing::error!(error = %message, "store failure");
                Self::internal("Internal server error")
            }
        }
    }
}
