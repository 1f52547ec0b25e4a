//! [`Command`] for creating a new [`Agent`].

use common::{
    operations::{Allocate, Commit, Insert, Transact, Transacted},
    Date, DateTime, Money, Percent,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{agent, contact, Agent},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Agent`].
#[derive(Clone, Debug)]
pub struct CreateAgent {
    /// Name of a new [`Agent`].
    pub name: contact::Name,

    /// Phone number of a new [`Agent`].
    pub phone: contact::Phone,

    /// Email address of a new [`Agent`].
    pub email: Option<contact::Email>,

    /// Postal address of a new [`Agent`].
    pub address: Option<String>,

    /// Commission rate of a new [`Agent`].
    pub commission_percent: Percent,

    /// [`Date`] the new [`Agent`] joined on.
    pub joining_date: Date,

    /// Name of the bank the new [`Agent`] is paid via.
    pub bank_name: Option<String>,

    /// Bank account number of a new [`Agent`].
    pub bank_account: Option<String>,

    /// IFSC code of the new [`Agent`]'s bank branch.
    pub bank_ifsc: Option<String>,

    /// Free-form notes about a new [`Agent`].
    pub notes: Option<String>,
}

impl<Db> Command<CreateAgent> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Allocate<agent::BusinessId>,
            Ok = agent::BusinessId,
            Err = Traced<database::Error>,
        > + Database<Insert<Agent>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Agent;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateAgent) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateAgent {
            name,
            phone,
            email,
            address,
            commission_percent,
            joining_date,
            bank_name,
            bank_account,
            bank_ifsc,
            notes,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let business_id = tx
            .execute(Allocate::<agent::BusinessId>::new())
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let agent = Agent {
            id: agent::Id::new(),
            business_id,
            name,
            phone,
            email,
            address,
            commission_percent,
            joining_date,
            is_active: true,
            total_sales: 0,
            total_commission_earned: Money::ZERO,
            bank_name,
            bank_account,
            bank_ifsc,
            notes,
            created_at: DateTime::now(),
        };
        tx.execute(Insert(agent.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(agent)
    }
}

/// Error of [`CreateAgent`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
