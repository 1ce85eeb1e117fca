//! Remote mirror contract types and validation
//!
//! The remote mirror is a document database. These types describe the habit
//! document sent on create, the envelope the REST client wraps it in, and the
//! error body the server returns. They are shared between the REST client and
//! the in-memory mock.

pub mod error;
pub mod types;
pub mod validation;

pub use error::*;
pub use types::*;
