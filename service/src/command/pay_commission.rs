//! [`Command`] for marking a [`Transaction`]'s commission as paid out.

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{transaction, Transaction},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for marking a [`Transaction`]'s commission as paid out to the
/// involved [`Agent`].
///
/// [`Agent`]: crate::domain::Agent
#[derive(Clone, Copy, Debug, From)]
pub struct PayCommission {
    /// ID of the [`Transaction`] to mark the commission of.
    pub id: transaction::Id,
}

/// Output of [`PayCommission`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Transaction`] as it was before the update.
    pub before: Transaction,

    /// [`Transaction`] as it is after the update.
    pub after: Transaction,
}

impl<Db> Command<PayCommission> for Service<Db>
where
    Db: Database<
            Select<By<Option<Transaction>, transaction::Id>>,
            Ok = Option<Transaction>,
            Err = Traced<database::Error>,
        > + Database<Update<Transaction>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: PayCommission,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let PayCommission { id } = cmd;

        let before = self
            .database()
            .execute(Select(By::<Option<Transaction>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::TransactionNotExists(id))
            .map_err(tracerr::wrap!())?;

        let mut after = before.clone();
        after.commission_paid = true;

        self.database()
            .execute(Update(after.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output { before, after })
    }
}

/// Error of [`PayCommission`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Transaction`] with the provided ID does not exist.
    #[display("`Transaction(id: {_0})` does not exist")]
    TransactionNotExists(#[error(not(source))] transaction::Id),
}
