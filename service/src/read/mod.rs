//! Read entities definitions.

pub mod activity;
pub mod agent;
pub mod customer;
pub mod land;
pub mod transaction;
pub mod user;
