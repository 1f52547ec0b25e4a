//! [`Command`] for updating an existing [`Land`].

use common::{
    operations::{By, Select, Update},
    Money,
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

/// [`Command`] for updating an existing [`Land`].
///
/// Absent fields keep their current values.
#[derive(Clone, Debug, Default)]
pub struct UpdateLand {
    /// ID of the [`Land`] to update.
    pub id: land::Id,

    /// New [`land::Location`].
    pub location: Option<land::Location>,

    /// New area size.
    pub area_size: Option<Decimal>,

    /// New area unit.
    pub area_unit: Option<land::AreaUnit>,

    /// New asking price.
    pub price: Option<Money>,

    /// New [`land::SurveyNumber`].
    pub survey_number: Option<land::SurveyNumber>,

    /// New [`land::Kind`].
    pub kind: Option<land::Kind>,

    /// New [`land::Status`].
    pub status: Option<land::Status>,

    /// New description.
    pub description: Option<String>,

    /// New document references.
    pub documents: Option<Vec<FileRef>>,

    /// New [`land::Coordinates`].
    pub coordinates: Option<land::Coordinates>,

    /// New primary [`agent::Id`].
    pub primary_agent_id: Option<agent::Id>,
}

/// Output of [`UpdateLand`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Land`] as it was before the update.
    pub before: Land,

    /// [`Land`] as it is after the update.
    pub after: Land,
}

impl<Db> Command<UpdateLand> for Service<Db>
where
    Db: Database<
            Select<By<Option<Land>, land::Id>>,
            Ok = Option<Land>,
            Err = Traced<database::Error>,
        > + Database<Update<Land>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateLand) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateLand {
            id,
            location,
            area_size,
            area_unit,
            price,
            survey_number,
            kind,
            status,
            description,
            documents,
            coordinates,
            primary_agent_id,
        } = cmd;

        if matches!(area_size, Some(s) if s <= Decimal::ZERO) {
            return Err(tracerr::new!(E::InvalidAreaSize));
        }

        let before = self
            .database()
            .execute(Select(By::<Option<Land>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::LandNotExists(id))
            .map_err(tracerr::wrap!())?;

        let mut after = before.clone();
        if let Some(v) = location {
            after.location = v;
        }
        if let Some(v) = area_size {
            after.area_size = v;
        }
        if let Some(v) = area_unit {
            after.area_unit = v;
        }
        if let Some(v) = price {
            after.price = v;
        }
        if let Some(v) = survey_number {
            after.survey_number = Some(v);
        }
        if let Some(v) = kind {
            after.kind = v;
        }
        if let Some(v) = status {
            after.status = v;
        }
        if let Some(v) = description {
            after.description = Some(v);
        }
        if let Some(v) = documents {
            after.documents = v;
        }
        if let Some(v) = coordinates {
            after.coordinates = Some(v);
        }
        if let Some(v) = primary_agent_id {
            after.primary_agent_id = Some(v);
        }

        self.database()
            .execute(Update(after.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output { before, after })
    }
}

/// Error of [`UpdateLand`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Area size is not positive.
    #[display("`Land` area size must be positive")]
    InvalidAreaSize,

    /// [`Land`] with the provided ID does not exist.
    #[display("`Land(id: {_0})` does not exist")]
    LandNotExists(#[error(not(source))] land::Id),
}
