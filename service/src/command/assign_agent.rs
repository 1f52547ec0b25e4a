//! [`Command`] for assigning an [`Agent`] to a [`Land`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted, Update},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{agent, assignment, land, Agent, Assignment, Land},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for assigning an [`Agent`] to a [`Land`].
///
/// Finds or creates the [`Assignment`] for the (land, agent) pair, so
/// repeated assignments never duplicate it.
#[derive(Clone, Debug)]
pub struct AssignAgent {
    /// ID of the [`Land`] to assign the [`Agent`] to.
    pub land_id: land::Id,

    /// ID of the [`Agent`] to assign.
    pub agent_id: agent::Id,

    /// Indicator whether the [`Agent`] becomes the primary one for the
    /// [`Land`].
    pub is_primary: bool,

    /// Free-form notes about the [`Assignment`].
    pub notes: Option<String>,
}

impl<Db> Command<AssignAgent> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Land>, land::Id>>,
            Ok = Option<Land>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Agent>, agent::Id>>,
            Ok = Option<Agent>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Land, land::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Assignment>, (land::Id, agent::Id)>>,
            Ok = Option<Assignment>,
            Err = Traced<database::Error>,
        > + Database<Insert<Assignment>, Ok = (), Err = Traced<database::Error>>
        + Database<Update<Land>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Assignment;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: AssignAgent) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AssignAgent {
            land_id,
            agent_id,
            is_primary,
            notes,
        } = cmd;

        let mut land = self
            .database()
            .execute(Select(By::<Option<Land>, _>::new(land_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::LandNotExists(land_id))
            .map_err(tracerr::wrap!())?;

        self.database()
            .execute(Select(By::<Option<Agent>, _>::new(agent_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::AgentNotExists(agent_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Land`.
        tx.execute(Lock(By::new(land.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let existing = tx
            .execute(Select(By::<Option<Assignment>, _>::new((
                land_id, agent_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let assignment = if let Some(assignment) = existing {
            assignment
        } else {
            let assignment = Assignment {
                id: assignment::Id::new(),
                land_id,
                agent_id,
                assigned_on: Date::today(),
                status: assignment::Status::Active,
                notes,
            };
            tx.execute(Insert(assignment.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            assignment
        };

        if is_primary {
            land.primary_agent_id = Some(agent_id);
            tx.execute(Update(land))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(assignment)
    }
}

/// Error of [`AssignAgent`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Agent`] with the provided ID does not exist.
    #[display("`Agent(id: {_0})` does not exist")]
    AgentNotExists(#[error(not(source))] agent::Id),

    /// [`Land`] with the provided ID does not exist.
    #[display("`Land(id: {_0})` does not exist")]
    LandNotExists(#[error(not(source))] land::Id),
}
