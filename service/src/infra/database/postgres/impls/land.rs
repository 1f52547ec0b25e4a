//! [`Land`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{land, Land},
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

/// Reconstructs a [`Land`] from the provided [`Row`].
pub(super) fn from_row(row: &Row) -> Land {
    let latitude = row.get::<_, Option<Decimal>>("latitude");
    let longitude = row.get::<_, Option<Decimal>>("longitude");

    Land {
        id: row.get("id"),
        business_id: row.get("business_id"),
        location: row.get("location"),
        area_size: row.get("area_size"),
        area_unit: row.get("area_unit"),
        price: row.get("price"),
        survey_number: row.get("survey_number"),
        kind: row.get("kind"),
        status: row.get("status"),
        description: row.get("description"),
        documents: row.get("documents"),
        coordinates: latitude.zip(longitude).map(|(latitude, longitude)| {
            land::Coordinates {
                latitude,
                longitude,
            }
        }),
        purchased_by: row.get("purchased_by"),
        primary_agent_id: row.get("primary_agent_id"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Land>, land::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Land>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Land>, land::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: land::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, business_id, location, area_size, area_unit, price, \
                   survey_number, kind, status, description, documents, \
                   latitude, longitude, \
                   purchased_by, primary_agent_id, created_at \
            FROM lands \
            WHERE id = $1::UUID \
            LIMIT 1";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Insert<Land>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Land>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(land): Insert<Land>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(land)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Land>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(land): Update<Land>,
    ) -> Result<Self::Ok, Self::Err> {
        let Land {
            id,
            business_id,
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
            purchased_by,
            primary_agent_id,
            created_at,
        } = land;

        let latitude = coordinates.map(|c| c.latitude);
        let longitude = coordinates.map(|c| c.longitude);

        const SQL: &str = "\
            INSERT INTO lands (\
                id, business_id, location, area_size, area_unit, price, \
                survey_number, kind, status, description, documents, \
                latitude, longitude, \
                purchased_by, primary_agent_id, created_at \
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, \
                $4::NUMERIC, $5::INT2, $6::NUMERIC, \
                $7::VARCHAR, $8::INT2, $9::INT2, $10::VARCHAR, \
                $11::VARCHAR[], \
                $12::NUMERIC, $13::NUMERIC, \
                $14::UUID, $15::UUID, \
                $16::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET business_id = EXCLUDED.business_id, \
                location = EXCLUDED.location, \
                area_size = EXCLUDED.area_size, \
                area_unit = EXCLUDED.area_unit, \
                price = EXCLUDED.price, \
                survey_number = EXCLUDED.survey_number, \
                kind = EXCLUDED.kind, \
                status = EXCLUDED.status, \
                description = EXCLUDED.description, \
                documents = EXCLUDED.documents, \
                latitude = EXCLUDED.latitude, \
                longitude = EXCLUDED.longitude, \
                purchased_by = EXCLUDED.purchased_by, \
                primary_agent_id = EXCLUDED.primary_agent_id";
        self.exec(
            SQL,
            &[
                &id,
                &business_id,
                &location,
                &area_size,
                &area_unit,
                &price,
                &survey_number,
                &kind,
                &status,
                &description,
                &documents,
                &latitude,
                &longitude,
                &purchased_by,
                &primary_agent_id,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Land, land::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Land, land::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: land::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM lands \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Land, land::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Land, land::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: land::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO lands_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<read::land::HasTransactions, land::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::land::HasTransactions;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::land::HasTransactions, land::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let land_id: land::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM transactions \
            WHERE land_id = $1::UUID \
            LIMIT 1";
        self.query_opt(SQL, &[&land_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|r| read::land::HasTransactions(r.is_some()))
    }
}

impl<C> Database<Select<By<read::land::Stats, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::land::Stats;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::land::Stats, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*) FILTER (WHERE status = $1::INT2) AS available, \
                   COUNT(*) FILTER (WHERE status = $2::INT2) AS reserved, \
                   COUNT(*) FILTER (WHERE status = $3::INT2) AS sold, \
                   COALESCE(SUM(price), 0)::NUMERIC AS total_value, \
                   COALESCE(SUM(price) FILTER (WHERE status = $3::INT2), 0)\
                       ::NUMERIC AS sold_value \
            FROM lands";
        self.query_opt(
            SQL,
            &[
                &land::Status::Available,
                &land::Status::Reserved,
                &land::Status::Sold,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(|row| {
            let row = row.expect("always exists");
            read::land::Stats {
                available: row.get("available"),
                reserved: row.get("reserved"),
                sold: row.get("sold"),
                total_value: row.get("total_value"),
                sold_value: row.get("sold_value"),
            }
        })
    }
}

impl<C>
    Database<Select<By<read::land::list::Page, read::land::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::land::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::land::list::Page, read::land::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::land::list::Selector {
            arguments,
            filter:
                read::land::list::Filter {
                    search,
                    status,
                    kind,
                    min_price,
                    max_price,
                    agent_id,
                },
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];

        let search_pattern =
            search.as_ref().map(|s| FuzzPattern::new(s.as_ref()));
        let search_idx = search_pattern.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });
        let kind_idx = kind.as_ref().map(|k| {
            ps.push(k);
            ps.len()
        });
        let min_price_idx = min_price.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });
        let max_price_idx = max_price.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });
        let agent_idx = agent_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });

        let filtering = format!(
            "{search}{status}{kind}{min_price}{max_price}{agent}",
            search = search_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(
                    " AND LOWER(business_id || ' ' || location \
                       || ' ' || COALESCE(survey_number, '') \
                       || ' ' || COALESCE(description, '')) \
                       SIMILAR TO LOWER(${idx}::VARCHAR)"
                ))
            }),
            status = status_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(" AND status = ${idx}::INT2"))
            }),
            kind = kind_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(" AND kind = ${idx}::INT2"))
            }),
            min_price = min_price_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(" AND price >= ${idx}::NUMERIC"))
            }),
            max_price = max_price_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(" AND price <= ${idx}::NUMERIC"))
            }),
            agent = agent_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(" AND primary_agent_id = ${idx}::UUID"))
            }),
        );

        let count_sql = format!(
            "SELECT COUNT(*) AS total \
             FROM lands \
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
            "SELECT id, business_id, location, area_size, area_unit, price, \
                    survey_number, kind, status, description, documents, \
                    latitude, longitude, \
                    purchased_by, primary_agent_id, created_at \
             FROM lands \
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

        Ok(read::land::list::Page::new(
            &arguments,
            items,
            u64::try_from(total).unwrap_or_default(),
        ))
    }
}
