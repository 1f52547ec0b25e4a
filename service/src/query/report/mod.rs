//! Report [`Query`] definitions.
//!
//! [`Query`]: crate::Query

pub mod summary;

pub use self::summary::Summary;
