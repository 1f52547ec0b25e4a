//! [`Command`] for deleting a [`Transaction`].

use common::operations::{By, Delete, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{transaction, Transaction},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Transaction`].
///
/// Only removes the record. The [`Land`] lifecycle and the [`Agent`]'s
/// accrued totals are not rolled back.
///
/// [`Agent`]: crate::domain::Agent
/// [`Land`]: crate::domain::Land
#[derive(Clone, Copy, Debug, From)]
pub struct DeleteTransaction {
    /// ID of the [`Transaction`] to delete.
    pub id: transaction::Id,
}

impl<Db> Command<DeleteTransaction> for Service<Db>
where
    Db: Database<
            Select<By<Option<Transaction>, transaction::Id>>,
            Ok = Option<Transaction>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Transaction, transaction::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = Transaction;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteTransaction,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteTransaction { id } = cmd;

        let transaction = self
            .database()
            .execute(Select(By::<Option<Transaction>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::TransactionNotExists(id))
            .map_err(tracerr::wrap!())?;

        self.database()
            .execute(Delete(By::<Transaction, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(transaction)
    }
}

/// Error of [`DeleteTransaction`] [`Command`] execution.
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
