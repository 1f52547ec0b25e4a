//! [`Assignment`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{agent, land, Assignment},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Reconstructs an [`Assignment`] from the provided [`Row`].
fn from_row(row: &Row) -> Assignment {
    Assignment {
        id: row.get("id"),
        land_id: row.get("land_id"),
        agent_id: row.get("agent_id"),
        assigned_on: row.get("assigned_on"),
        status: row.get("status"),
        notes: row.get("notes"),
    }
}

impl<C> Database<Select<By<Option<Assignment>, (land::Id, agent::Id)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Assignment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Assignment>, (land::Id, agent::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (land_id, agent_id) = by.into_inner();

        const SQL: &str = "\
            SELECT id, land_id, agent_id, assigned_on, status, notes \
            FROM agent_land_assignments \
            WHERE land_id = $1::UUID \
              AND agent_id = $2::UUID \
            LIMIT 1";
        self.query_opt(SQL, &[&land_id, &agent_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Insert<Assignment>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(assignment): Insert<Assignment>,
    ) -> Result<Self::Ok, Self::Err> {
        let Assignment {
            id,
            land_id,
            agent_id,
            assigned_on,
            status,
            notes,
        } = assignment;

        const SQL: &str = "\
            INSERT INTO agent_land_assignments (\
                id, land_id, agent_id, assigned_on, status, notes \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::DATE, $5::INT2, $6::VARCHAR \
            ) \
            ON CONFLICT (land_id, agent_id) DO NOTHING";
        self.exec(
            SQL,
            &[&id, &land_id, &agent_id, &assigned_on, &status, &notes],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
