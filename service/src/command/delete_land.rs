//! [`Command`] for deleting a [`Land`].

use common::operations::{By, Delete, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{land, Land},
    infra::{database, Database},
    read,
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Land`].
///
/// Deletion is blocked while any [`Transaction`] references the [`Land`].
///
/// [`Transaction`]: crate::domain::Transaction
#[derive(Clone, Copy, Debug, From)]
pub struct DeleteLand {
    /// ID of the [`Land`] to delete.
    pub id: land::Id,
}

impl<Db> Command<DeleteLand> for Service<Db>
where
    Db: Database<
            Select<By<Option<Land>, land::Id>>,
            Ok = Option<Land>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::land::HasTransactions, land::Id>>,
            Ok = read::land::HasTransactions,
            Err = Traced<database::Error>,
        > + Database<Delete<By<Land, land::Id>>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Land;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteLand) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteLand { id } = cmd;

        let land = self
            .database()
            .execute(Select(By::<Option<Land>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::LandNotExists(id))
            .map_err(tracerr::wrap!())?;

        let has_transactions = self
            .database()
            .execute(Select(By::<read::land::HasTransactions, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if *has_transactions {
            return Err(tracerr::new!(E::LandHasTransactions(id)));
        }

        self.database()
            .execute(Delete(By::<Land, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(land)
    }
}

/// Error of [`DeleteLand`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Land`] is referenced by [`Transaction`]s.
    ///
    /// [`Transaction`]: crate::domain::Transaction
    #[display("`Land(id: {_0})` is referenced by transactions")]
    LandHasTransactions(#[error(not(source))] land::Id),

    /// [`Land`] with the provided ID does not exist.
    #[display("`Land(id: {_0})` does not exist")]
    LandNotExists(#[error(not(source))] land::Id),
}
