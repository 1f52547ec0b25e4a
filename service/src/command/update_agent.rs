//! [`Command`] for updating an existing [`Agent`].

use common::{
    operations::{By, Select, Update},
    Date, Percent,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{agent, contact, Agent},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an existing [`Agent`].
///
/// Absent fields keep their current values. Sales counters are maintained by
/// transaction recording and cannot be edited here.
#[derive(Clone, Debug, Default)]
pub struct UpdateAgent {
    /// ID of the [`Agent`] to update.
    pub id: agent::Id,

    /// New [`contact::Name`].
    pub name: Option<contact::Name>,

    /// New [`contact::Phone`].
    pub phone: Option<contact::Phone>,

    /// New [`contact::Email`].
    pub email: Option<contact::Email>,

    /// New postal address.
    pub address: Option<String>,

    /// New commission rate.
    pub commission_percent: Option<Percent>,

    /// New joining [`Date`].
    pub joining_date: Option<Date>,

    /// New activity indicator.
    pub is_active: Option<bool>,

    /// New bank name.
    pub bank_name: Option<String>,

    /// New bank account number.
    pub bank_account: Option<String>,

    /// New IFSC code.
    pub bank_ifsc: Option<String>,

    /// New free-form notes.
    pub notes: Option<String>,
}

/// Output of [`UpdateAgent`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Agent`] as it was before the update.
    pub before: Agent,

    /// [`Agent`] as it is after the update.
    pub after: Agent,
}

impl<Db> Command<UpdateAgent> for Service<Db>
where
    Db: Database<
            Select<By<Option<Agent>, agent::Id>>,
            Ok = Option<Agent>,
            Err = Traced<database::Error>,
        > + Database<Update<Agent>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateAgent) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateAgent {
            id,
            name,
            phone,
            email,
            address,
            commission_percent,
            joining_date,
            is_active,
            bank_name,
            bank_account,
            bank_ifsc,
            notes,
        } = cmd;

        let before = self
            .database()
            .execute(Select(By::<Option<Agent>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::AgentNotExists(id))
            .map_err(tracerr::wrap!())?;

        let mut after = before.clone();
        if let Some(v) = name {
            after.name = v;
        }
        if let Some(v) = phone {
            after.phone = v;
        }
        if let Some(v) = email {
            after.email = Some(v);
        }
        if let Some(v) = address {
            after.address = Some(v);
        }
        if let Some(v) = commission_percent {
            after.commission_percent = v;
        }
        if let Some(v) = joining_date {
            after.joining_date = v;
        }
        if let Some(v) = is_active {
            after.is_active = v;
        }
        if let Some(v) = bank_name {
            after.bank_name = Some(v);
        }
        if let Some(v) = bank_account {
            after.bank_account = Some(v);
        }
        if let Some(v) = bank_ifsc {
            after.bank_ifsc = Some(v);
        }
        if let Some(v) = notes {
            after.notes = Some(v);
        }

        self.database()
            .execute(Update(after.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output { before, after })
    }
}

/// Error of [`UpdateAgent`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Agent`] with the provided ID does not exist.
    #[display("`Agent(id: {_0})` does not exist")]
    AgentNotExists(#[error(not(source))] agent::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
