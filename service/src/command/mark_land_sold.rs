//! [`Command`] for administratively marking a [`Land`] as sold.

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{customer, land, Customer, Land},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for administratively marking a [`Land`] as sold.
///
/// Unlike the regular lifecycle transition, this edits the status directly
/// and optionally records the buyer.
#[derive(Clone, Copy, Debug)]
pub struct MarkLandSold {
    /// ID of the [`Land`] to mark as sold.
    pub id: land::Id,

    /// ID of the buying [`Customer`], if known.
    pub purchased_by: Option<customer::Id>,
}

impl<Db> Command<MarkLandSold> for Service<Db>
where
    Db: Database<
            Select<By<Option<Land>, land::Id>>,
            Ok = Option<Land>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<Update<Land>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Land;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: MarkLandSold) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let MarkLandSold { id, purchased_by } = cmd;

        let mut land = self
            .database()
            .execute(Select(By::<Option<Land>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::LandNotExists(id))
            .map_err(tracerr::wrap!())?;

        if let Some(customer_id) = purchased_by {
            self.database()
                .execute(Select(By::<Option<Customer>, _>::new(customer_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::CustomerNotExists(customer_id))
                .map_err(tracerr::wrap!())
                .map(drop)?;
            land.purchased_by = Some(customer_id);
        }
        land.status = land::Status::Sold;

        self.database()
            .execute(Update(land.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(land)
    }
}

/// Error of [`MarkLandSold`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Land`] with the provided ID does not exist.
    #[display("`Land(id: {_0})` does not exist")]
    LandNotExists(#[error(not(source))] land::Id),
}
