//! [`Customer`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{customer, Customer},
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

/// Reconstructs a [`Customer`] from the provided [`Row`].
fn from_row(row: &Row) -> Customer {
    Customer {
        id: row.get("id"),
        business_id: row.get("business_id"),
        name: row.get("name"),
        phone: row.get("phone"),
        email: row.get("email"),
        address: row.get("address"),
        city: row.get("city"),
        state: row.get("state"),
        pincode: row.get("pincode"),
        id_proof_kind: row.get("id_proof_kind"),
        id_proof_number: row.get("id_proof_number"),
        id_proof_file: row.get("id_proof_file"),
        is_active: row.get("is_active"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
    }
}

/// Columns of the `customers` table, in the [`from_row`] order.
const COLUMNS: &str = "\
    id, business_id, name, phone, email, \
    address, city, state, pincode, \
    id_proof_kind, id_proof_number, id_proof_file, \
    is_active, notes, created_at";

impl<C> Database<Select<By<Option<Customer>, customer::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Customer>, customer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: customer::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM customers \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        self.query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Insert<Customer>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Customer>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(customer): Insert<Customer>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(customer))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Customer>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(customer): Update<Customer>,
    ) -> Result<Self::Ok, Self::Err> {
        let Customer {
            id,
            business_id,
            name,
            phone,
            email,
            address,
            city,
            state,
            pincode,
            id_proof_kind,
            id_proof_number,
            id_proof_file,
            is_active,
            notes,
            created_at,
        } = customer;

        const SQL: &str = "\
            INSERT INTO customers (\
                id, business_id, name, phone, email, \
                address, city, state, pincode, \
                id_proof_kind, id_proof_number, id_proof_file, \
                is_active, notes, created_at \
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::VARCHAR, \
                $6::VARCHAR, $7::VARCHAR, $8::VARCHAR, $9::VARCHAR, \
                $10::INT2, $11::VARCHAR, $12::VARCHAR, \
                $13::BOOL, $14::VARCHAR, $15::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET business_id = EXCLUDED.business_id, \
                name = EXCLUDED.name, \
                phone = EXCLUDED.phone, \
                email = EXCLUDED.email, \
                address = EXCLUDED.address, \
                city = EXCLUDED.city, \
                state = EXCLUDED.state, \
                pincode = EXCLUDED.pincode, \
                id_proof_kind = EXCLUDED.id_proof_kind, \
                id_proof_number = EXCLUDED.id_proof_number, \
                id_proof_file = EXCLUDED.id_proof_file, \
                is_active = EXCLUDED.is_active, \
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
                &city,
                &state,
                &pincode,
                &id_proof_kind,
                &id_proof_number,
                &id_proof_file,
                &is_active,
                &notes,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Customer, customer::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Customer, customer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: customer::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM customers \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<read::customer::HasTransactions, customer::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::customer::HasTransactions;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::customer::HasTransactions, customer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let customer_id: customer::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM transactions \
            WHERE customer_id = $1::UUID \
            LIMIT 1";
        self.query_opt(SQL, &[&customer_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|r| read::customer::HasTransactions(r.is_some()))
    }
}

impl<C> Database<Select<By<read::customer::Purchases, customer::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::customer::Purchases;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::customer::Purchases, customer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let customer_id: customer::Id = by.into_inner();

        const LANDS_SQL: &str = "\
            SELECT id, business_id, location, area_size, area_unit, price, \
                   survey_number, kind, status, description, documents, \
                   latitude, longitude, \
                   purchased_by, primary_agent_id, created_at \
            FROM lands \
            WHERE purchased_by = $1::UUID \
            ORDER BY created_at DESC";
        let lands = self
            .query(LANDS_SQL, &[&customer_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(super::land::from_row)
            .collect();

        const TRANSACTIONS_SQL: &str = "\
            SELECT id, business_id, receipt_number, \
                   land_id, customer_id, agent_id, \
                   amount, payment_method, payment_kind, \
                   installment_number, total_installments, transaction_date, \
                   receipt_file, cheque_number, cheque_date, bank_reference, \
                   status, notes, commission, commission_paid, created_at \
            FROM transactions \
            WHERE customer_id = $1::UUID \
            ORDER BY transaction_date DESC, created_at DESC";
        let transactions = self
            .query(TRANSACTIONS_SQL, &[&customer_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(super::transaction::from_row)
            .collect();

        Ok(read::customer::Purchases {
            lands,
            transactions,
        })
    }
}

impl<C>
    Database<
        Select<By<read::customer::list::Page, read::customer::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::customer::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::customer::list::Page, read::customer::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::customer::list::Selector {
            arguments,
            filter: read::customer::list::Filter { search, is_active },
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
             FROM customers \
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
             FROM customers \
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

        Ok(read::customer::list::Page::new(
            &arguments,
            items,
            u64::try_from(total).unwrap_or_default(),
        ))
    }
}
