//! [`Agent`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{agent, assignment, Agent},
    infra::{
        database::{
            self,
            postgres::{Connection, FuzzPattern},
            Postgres,
        },
        Database,
    },
    read,
};

/// Reconstructs an [`Agent`] from the provided [`Row`].
pub(super) fn from_row(row: &Row) -> Agent {
    Agent {
        id: row.get("id"),
        business_id: row.get("business_id"),
        name: row.get("name"),
        phone: row.get("phone"),
        email: row.get("email"),
        address: row.get("address"),
        commission_percent: row.get("commission_percent"),
        joining_date: row.get("joining_date"),
        is_active: row.get("is_active"),
        total_sales: row.get("total_sales"),
        total_commission_earned: row.get("total_commission_earned"),
        bank_name: row.get("bank_name"),
        bank_account: row.get("bank_account"),
        bank_ifsc: row.get("bank_ifsc"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
    }
}

/// Columns of the `agents` table, in the [`from_row`] order.
pub(super) const COLUMNS: &str = "\
    id, business_id, name, phone, email, address, \
    commission_percent, joining_date, is_active, \
    total_sales, total_commission_earned, \
    bank_name, bank_account, bank_ifsc, \
    notes, created_at";

impl<C> Database<Select<By<Option<Agent>, agent::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Agent>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Agent>, agent::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: agent::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM agents \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        self.query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Insert<Agent>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Agent>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(agent): Insert<Agent>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(agent)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Agent>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(agent): Update<Agent>,
    ) -> Result<Self::Ok, Self::Err> {
        let Agent {
            id,
            business_id,
            name,
            phone,
            email,
            address,
            commission_percent,
            joining_date,
            is_active,
            total_sales,
            total_commission_earned,
            bank_name,
            bank_account,
            bank_ifsc,
            notes,
            created_at,
        } = agent;

        const SQL: &str = "\
            INSERT INTO agents (\
                id, business_id, name, phone, email, address, \
                commission_percent, joining_date, is_active, \
                total_sales, total_commission_earned, \
                bank_name, bank_account, bank_ifsc, \
                notes, created_at \
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::VARCHAR, $6::VARCHAR, \
                $7::NUMERIC, $8::DATE, $9::BOOL, \
                $10::INT4, $11::NUMERIC, \
                $12::VARCHAR, $13::VARCHAR, $14::VARCHAR, \
                $15::VARCHAR, $16::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET business_id = EXCLUDED.business_id, \
                name = EXCLUDED.name, \
                phone = EXCLUDED.phone, \
                email = EXCLUDED.email, \
                address = EXCLUDED.address, \
                commission_percent = EXCLUDED.commission_percent, \
                joining_date = EXCLUDED.joining_date, \
                is_active = EXCLUDED.is_active, \
                total_sales = EXCLUDED.total_sales, \
                total_commission_earned = \
                    EXCLUDED.total_commission_earned, \
                bank_name = EXCLUDED.bank_name, \
                bank_account = EXCLUDED.bank_account, \
                bank_ifsc = EXCLUDED.bank_ifsc, \
                notes = EXCLUDED.notes";
        self.exec(
            SQL,
            &[
                &id,
                &business_id,
                &name,
                &phone,
                &email,
                &address,
                &commission_percent,
                &joining_date,
                &is_active,
                &total_sales,
                &total_commission_earned,
                &bank_name,
                &bank_account,
                &bank_ifsc,
                &notes,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Agent, agent::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Agent, agent::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: agent::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM agents \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<read::agent::HasActiveAssignments, agent::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::agent::HasActiveAssignments;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::agent::HasActiveAssignments, agent::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let agent_id: agent::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM agent_land_assignments \
            WHERE agent_id = $1::UUID \
              AND status = $2::INT2 \
            LIMIT 1";
        self.query_opt(SQL, &[&agent_id, &assignment::Status::Active])
            .await
            .map_err(tracerr::wrap!())
            .map(|r| read::agent::HasActiveAssignments(r.is_some()))
    }
}

impl<C>
    Database<Select<By<read::agent::list::Page, read::agent::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::agent::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::agent::list::Page, read::agent::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::agent::list::Selector {
            arguments,
            filter: read::agent::list::Filter { search, is_active },
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];

        let search_pattern =
            search.as_ref().map(|s| FuzzPattern::new(s.as_ref()));
        let search_idx = search_pattern.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });
        let is_active_idx = is_active.as_ref().map(|a| {
            ps.push(a);
            ps.len()
        });

        let filtering = format!(
            "{search}{is_active}",
            search = search_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(
                    " AND LOWER(business_id || ' ' || name \
                       || ' ' || phone || ' ' || COALESCE(email, '')) \
                       SIMILAR TO LOWER(${idx}::VARCHAR)"
                ))
            }),
            is_active = is_active_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(" AND is_active = ${idx}::BOOL"))
            }),
        );

        let count_sql = format!(
            "SELECT COUNT(*) AS total \
             FROM agents \
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
             FROM agents \
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

        Ok(read::agent::list::Page::new(
            &arguments,
            items,
            u64::try_from(total).unwrap_or_default(),
        ))
    }
}
