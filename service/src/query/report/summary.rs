//! [`Summary`] definition.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    infra::{database, Database},
    read, Query, Service,
};

/// [`Query`] for the dashboard summary.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Summary;

/// Output of the [`Summary`] [`Query`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Output {
    /// Aggregated [`Land`] counters.
    ///
    /// [`Land`]: crate::domain::Land
    pub lands: read::land::Stats,

    /// Aggregated [`Transaction`] counters.
    ///
    /// [`Transaction`]: crate::domain::Transaction
    pub transactions: read::transaction::Stats,
}

impl<Db> Query<Summary> for Service<Db>
where
    Db: Database<
            Select<By<read::land::Stats, ()>>,
            Ok = read::land::Stats,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::transaction::Stats, ()>>,
            Ok = read::transaction::Stats,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Summary) -> Result<Self::Ok, Self::Err> {
        let lands = self
            .database()
            .execute(Select(By::<read::land::Stats, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?;

        let transactions = self
            .database()
            .execute(Select(By::<read::transaction::Stats, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Output {
            lands,
            transactions,
        })
    }
}
