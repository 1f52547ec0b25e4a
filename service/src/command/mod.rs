//! [`Command`] definition.

pub mod assign_agent;
pub mod authorize_user_session;
pub mod create_agent;
pub mod create_customer;
pub mod create_land;
pub mod create_user;
pub mod create_user_session;
pub mod delete_agent;
pub mod delete_customer;
pub mod delete_land;
pub mod delete_transaction;
pub mod mark_land_sold;
pub mod pay_commission;
pub mod record_transaction;
pub mod update_agent;
pub mod update_customer;
pub mod update_land;
pub mod update_transaction;
pub mod update_user;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    assign_agent::AssignAgent, authorize_user_session::AuthorizeUserSession,
    create_agent::CreateAgent, create_customer::CreateCustomer,
    create_land::CreateLand, create_user::CreateUser,
    create_user_session::CreateUserSession, delete_agent::DeleteAgent,
    delete_customer::DeleteCustomer, delete_land::DeleteLand,
    delete_transaction::DeleteTransaction, mark_land_sold::MarkLandSold,
    pay_commission::PayCommission, record_transaction::RecordTransaction,
    update_agent::UpdateAgent, update_customer::UpdateCustomer,
    update_land::UpdateLand, update_transaction::UpdateTransaction,
    update_user::UpdateUser,
};
