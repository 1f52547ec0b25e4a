//! Activity log [`Database`] implementations.

use common::operations::{By, Insert, Select};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::activity,
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Reconstructs an [`activity::Entry`] from the provided [`Row`].
fn from_row(row: &Row) -> activity::Entry {
    activity::Entry {
        id: row.get("id"),
        user_id: row.get("user_id"),
        action: row.get("action"),
        entity: row.get("entity"),
        entity_id: row.get("entity_id"),
        description: row.get("description"),
        old_values: row.get("old_values"),
        new_values: row.get("new_values"),
        ip_address: row.get("ip_address"),
        user_agent: row.get("user_agent"),
        created_at: row.get("created_at"),
    }
}

/// Columns of the `activity_logs` table, in the [`from_row`] order.
const COLUMNS: &str = "\
    id, user_id, action, entity, entity_id, description, \
    old_values, new_values, ip_address, user_agent, created_at";

impl<C> Database<Insert<activity::Entry>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(entry): Insert<activity::Entry>,
    ) -> Result<Self::Ok, Self::Err> {
        let activity::Entry {
            id,
            user_id,
            action,
            entity,
            entity_id,
            description,
            old_values,
            new_values,
            ip_address,
            user_agent,
            created_at,
        } = entry;

        // Append-only, so no upsert here.
        const SQL: &str = "\
            INSERT INTO activity_logs (\
                id, user_id, action, entity, entity_id, description, \
                old_values, new_values, ip_address, user_agent, created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::INT2, $4::INT2, \
                $5::VARCHAR, $6::VARCHAR, \
                $7::JSONB, $8::JSONB, \
                $9::VARCHAR, $10::VARCHAR, $11::TIMESTAMPTZ \
            )";
        self.exec(
            SQL,
            &[
                &id,
                &user_id,
                &action,
                &entity,
                &entity_id,
                &description,
                &old_values,
                &new_values,
                &ip_address,
                &user_agent,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C>
    Database<
        Select<By<read::activity::list::Page, read::activity::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::activity::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::activity::list::Page, read::activity::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::activity::list::Selector {
            arguments,
            filter:
                read::activity::list::Filter {
                    user_id,
                    entity,
                    action,
                },
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];

        let user_idx = user_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });
        let entity_idx = entity.as_ref().map(|e| {
            ps.push(e);
            ps.len()
        });
        let action_idx = action.as_ref().map(|a| {
            ps.push(a);
            ps.len()
        });

        let filtering = format!(
            "{user}{entity}{action}",
            user = user_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(" AND user_id = ${idx}::UUID"))
            }),
            entity = entity_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(" AND entity = ${idx}::INT2"))
            }),
            action = action_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(" AND action = ${idx}::INT2"))
            }),
        );

        let count_sql = format!(
            "SELECT COUNT(*) AS total \
             FROM activity_logs \
             WHERE true{filtering}",
        );
        let total = self
            .query_opt(&count_sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .map_or(0, |row| row.get::<_, i64>("total"));

        let limit = i64::from(arguments.limit);
        ps.push(&limit);
        let limit_idx = ps.len();
        let offset = i64::try_from(arguments.offset()).unwrap_or(i64::MAX);
        ps.push(&offset);
        let offset_idx = ps.len();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM activity_logs \
             WHERE true{filtering} \
             ORDER BY created_at {order}, id {order} \
             LIMIT ${limit_idx}::INT8 OFFSET ${offset_idx}::INT8",
            order = arguments.order.sql(),
        );
        let items = self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect();

        Ok(read::activity::list::Page::new(
            &arguments,
            items,
            u64::try_from(total).unwrap_or_default(),
        ))
    }
}
