//! [`Command`] for creating a new [`Land`].

use common::{
    operations::{Allocate, Commit, Insert, Transact, Transacted},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{agent, land, FileRef, Land},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Land`].
#[derive(Clone, Debug)]
pub struct CreateLand {
    /// [`land::Location`] of a new [`Land`].
    pub location: land::Location,

    /// Size of the area of a new [`Land`].
    pub area_size: Decimal,

    /// Unit the area is measured in.
    pub area_unit: land::AreaUnit,

    /// Asking price for a new [`Land`].
    pub price: Money,

    /// [`land::SurveyNumber`] of a new [`Land`].
    pub survey_number: Option<land::SurveyNumber>,

    /// [`land::Kind`] of a new [`Land`].
    pub kind: land::Kind,

    /// Free-form description of a new [`Land`].
    pub description: Option<String>,

    /// References to documents attached to a new [`Land`].
    pub documents: Vec<FileRef>,

    /// Geographic [`land::Coordinates`] of a new [`Land`].
    pub coordinates: Option<land::Coordinates>,

    /// Primary [`agent::Id`] assigned to a new [`Land`].
    pub primary_agent_id: Option<agent::Id>,
}

impl<Db> Command<CreateLand> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Allocate<land::BusinessId>,
            Ok = land::BusinessId,
            Err = Traced<database::Error>,
        > + Database<Insert<Land>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Land;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateLand) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateLand {
            location,
            area_size,
            area_unit,
            price,
            survey_number,
            kind,
            description,
            documents,
            coordinates,
            primary_agent_id,
        } = cmd;

        if area_size <= Decimal::ZERO {
            return Err(tracerr::new!(E::InvalidAreaSize));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let business_id = tx
            .execute(Allocate::<land::BusinessId>::new())
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let land = Land {
            id: land::Id::new(),
            business_id,
            location,
            area_size,
            area_unit,
            price,
            survey_number,
            kind,
            status: land::Status::Available,
            description,
            documents,
            coordinates,
            purchased_by: None,
            primary_agent_id,
            created_at: DateTime::now(),
        };
        tx.execute(Insert(land.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(land)
    }
}

/// Error of [`CreateLand`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Area size is not positive.
    #[display("`Land` area size must be positive")]
    InvalidAreaSize,
}
