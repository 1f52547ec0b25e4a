//! [`Command`] for deleting an [`Agent`].

use common::operations::{By, Delete, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{agent, Agent},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for deleting an [`Agent`].
///
/// Deletion is blocked while the [`Agent`] has active [`Assignment`]s.
///
/// [`Assignment`]: crate::domain::Assignment
#[derive(Clone, Copy, Debug, From)]
pub struct DeleteAgent {
    /// ID of the [`Agent`] to delete.
    pub id: agent::Id,
}

impl<Db> Command<DeleteAgent> for Service<Db>
where
    Db: Database<
            Select<By<Option<Agent>, agent::Id>>,
            Ok = Option<Agent>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::agent::HasActiveAssignments, agent::Id>>,
            Ok = read::agent::HasActiveAssignments,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Agent, agent::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = Agent;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteAgent) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteAgent { id } = cmd;

        let agent = self
            .database()
            .execute(Select(By::<Option<Agent>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::AgentNotExists(id))
            .map_err(tracerr::wrap!())?;

        let has_assignments = self
            .database()
            .execute(Select(
                By::<read::agent::HasActiveAssignments, _>::new(id),
            ))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if *has_assignments {
            return Err(tracerr::new!(E::AgentHasActiveAssignments(id)));
        }

        self.database()
            .execute(Delete(By::<Agent, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(agent)
    }
}

/// Error of [`DeleteAgent`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Agent`] has active [`Assignment`]s.
    ///
    /// [`Assignment`]: crate::domain::Assignment
    #[display("`Agent(id: {_0})` has active assignments")]
    AgentHasActiveAssignments(#[error(not(source))] agent::Id),

    /// [`Agent`] with the provided ID does not exist.
    #[display("`Agent(id: {_0})` does not exist")]
    AgentNotExists(#[error(not(source))] agent::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
