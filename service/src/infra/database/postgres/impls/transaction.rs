//! [`Transaction`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Select, Update},
    Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        agent, customer, land, transaction, Agent, Customer, Land, Transaction,
    },
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

/// Reconstructs a [`Transaction`] from the provided [`Row`].
pub(super) fn from_row(row: &Row) -> Transaction {
    Transaction {
        id: row.get("id"),
        business_id: row.get("business_id"),
        receipt_number: row.get("receipt_number"),
        land_id: row.get("land_id"),
        customer_id: row.get("customer_id"),
        agent_id: row.get("agent_id"),
        amount: row.get("amount"),
        payment_method: row.get("payment_method"),
        payment_kind: row.get("payment_kind"),
        installment_number: row.get("installment_number"),
        total_installments: row.get("total_installments"),
        transaction_date: row.get("transaction_date"),
        receipt_file: row.get("receipt_file"),
        cheque_number: row.get("cheque_number"),
        cheque_date: row.get("cheque_date"),
        bank_reference: row.get("bank_reference"),
        status: row.get("status"),
        notes: row.get("notes"),
        commission: row.get("commission"),
        commission_paid: row.get("commission_paid"),
        created_at: row.get("created_at"),
    }
}

/// Columns of the `transactions` table, in the [`from_row`] order.
const COLUMNS: &str = "\
    id, business_id, receipt_number, \
    land_id, customer_id, agent_id, \
    amount, payment_method, payment_kind, \
    installment_number, total_installments, transaction_date, \
    receipt_file, cheque_number, cheque_date, bank_reference, \
    status, notes, commission, commission_paid, created_at";

impl<C> Database<Select<By<Option<Transaction>, transaction::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Transaction>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Transaction>, transaction::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: transaction::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM transactions \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        self.query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Insert<Transaction>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Transaction>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(transaction): Insert<Transaction>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(transaction))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Transaction>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(transaction): Update<Transaction>,
    ) -> Result<Self::Ok, Self::Err> {
        let Transaction {
            id,
            business_id,
            receipt_number,
            land_id,
            customer_id,
            agent_id,
            amount,
            payment_method,
            payment_kind,
            installment_number,
            total_installments,
            transaction_date,
            receipt_file,
            cheque_number,
            cheque_date,
            bank_reference,
            status,
            notes,
            commission,
            commission_paid,
            created_at,
        } = transaction;

        const SQL: &str = "\
            INSERT INTO transactions (\
                id, business_id, receipt_number, \
                land_id, customer_id, agent_id, \
                amount, payment_method, payment_kind, \
                installment_number, total_installments, transaction_date, \
                receipt_file, cheque_number, cheque_date, bank_reference, \
                status, notes, commission, commission_paid, created_at \
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, \
                $4::UUID, $5::UUID, $6::UUID, \
                $7::NUMERIC, $8::INT2, $9::INT2, \
                $10::INT4, $11::INT4, $12::DATE, \
                $13::VARCHAR, $14::VARCHAR, $15::DATE, $16::VARCHAR, \
                $17::INT2, $18::VARCHAR, $19::NUMERIC, $20::BOOL, \
                $21::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET agent_id = EXCLUDED.agent_id, \
                amount = EXCLUDED.amount, \
                payment_method = EXCLUDED.payment_method, \
                payment_kind = EXCLUDED.payment_kind, \
                installment_number = EXCLUDED.installment_number, \
                total_installments = EXCLUDED.total_installments, \
                transaction_date = EXCLUDED.transaction_date, \
                receipt_file = EXCLUDED.receipt_file, \
                cheque_number = EXCLUDED.cheque_number, \
                cheque_date = EXCLUDED.cheque_date, \
                bank_reference = EXCLUDED.bank_reference, \
                status = EXCLUDED.status, \
                notes = EXCLUDED.notes, \
                commission = EXCLUDED.commission, \
                commission_paid = EXCLUDED.commission_paid";
        self.exec(
            SQL,
            &[
                &id,
                &business_id,
                &receipt_number,
                &land_id,
                &customer_id,
                &agent_id,
                &amount,
                &payment_method,
                &payment_kind,
                &installment_number,
                &total_installments,
                &transaction_date,
                &receipt_file,
                &cheque_number,
                &cheque_date,
                &bank_reference,
                &status,
                &notes,
                &commission,
                &commission_paid,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Transaction, transaction::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Transaction, transaction::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: transaction::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM transactions \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C>
    Database<Select<By<Option<read::transaction::Details>, transaction::Id>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
            Select<By<Option<Transaction>, transaction::Id>>,
            Ok = Option<Transaction>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Land>, land::Id>>,
            Ok = Option<Land>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Agent>, agent::Id>>,
            Ok = Option<Agent>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Option<read::transaction::Details>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<read::transaction::Details>, transaction::Id>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let Some(transaction) = self
            .execute(Select(By::<Option<Transaction>, _>::new(id)))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let land = self
            .execute(Select(By::<Option<Land>, _>::new(transaction.land_id)))
            .await
            .map_err(tracerr::wrap!())?
            .expect("referenced `Land` always exists");
        let customer = self
            .execute(Select(By::<Option<Customer>, _>::new(
                transaction.customer_id,
            )))
            .await
            .map_err(tracerr::wrap!())?
            .expect("referenced `Customer` always exists");
        let agent = match transaction.agent_id {
            Some(agent_id) => self
                .execute(Select(By::<Option<Agent>, _>::new(agent_id)))
                .await
                .map_err(tracerr::wrap!())?,
            None => None,
        };

        Ok(Some(read::transaction::Details {
            transaction,
            land,
            customer,
            agent,
        }))
    }
}

impl<C> Database<Select<By<Option<read::transaction::LandPayments>, land::Id>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Land>, land::Id>>,
        Ok = Option<Land>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<read::transaction::LandPayments>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<read::transaction::LandPayments>, land::Id>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let land_id = by.into_inner();

        let Some(land) = self
            .execute(Select(By::<Option<Land>, _>::new(land_id)))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM transactions \
             WHERE land_id = $1::UUID \
             ORDER BY transaction_date DESC, created_at DESC",
        );
        let transactions: Vec<Transaction> = self
            .query(&sql, &[&land_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect();

        let total_paid: Money = transactions
            .iter()
            .filter(|t| {
                !matches!(
                    t.status,
                    transaction::Status::Failed
                        | transaction::Status::Refunded,
                )
            })
            .map(|t| t.amount)
            .sum();

        Ok(Some(read::transaction::LandPayments {
            land_price: land.price,
            total_paid,
            transactions,
        }))
    }
}

impl<C> Database<Select<By<read::transaction::Stats, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::transaction::Stats;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::transaction::Stats, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*) AS count, \
                   COALESCE(SUM(amount) \
                       FILTER (WHERE status = $1::INT2), 0)\
                       ::NUMERIC AS completed_amount, \
                   COALESCE(SUM(amount) \
                       FILTER (WHERE status = $2::INT2), 0)\
                       ::NUMERIC AS pending_amount, \
                   COALESCE(SUM(commission), 0)::NUMERIC AS total_commission, \
                   COALESCE(SUM(commission) \
                       FILTER (WHERE NOT commission_paid), 0)\
                       ::NUMERIC AS unpaid_commission \
            FROM transactions";
        self.query_opt(
            SQL,
            &[
                &transaction::Status::Completed,
                &transaction::Status::Pending,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(|row| {
            let row = row.expect("always exists");
            read::transaction::Stats {
                count: row.get("count"),
                completed_amount: row.get("completed_amount"),
                pending_amount: row.get("pending_amount"),
                total_commission: row.get("total_commission"),
                unpaid_commission: row.get("unpaid_commission"),
            }
        })
    }
}

impl<C>
    Database<
        Select<
            By<read::transaction::list::Page, read::transaction::list::Selector>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::transaction::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::transaction::list::Page, read::transaction::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::transaction::list::Selector {
            arguments,
            filter:
                read::transaction::list::Filter {
                    search,
                    status,
                    method,
                    land_id,
                    customer_id,
                    agent_id,
                    from,
                    to,
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
        let method_idx = method.as_ref().map(|m| {
            ps.push(m);
            ps.len()
        });
        let land_idx = land_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });
        let customer_idx = customer_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });
        let agent_idx = agent_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });
        let from_idx = from.as_ref().map(|d| {
            ps.push(d);
            ps.len()
        });
        let to_idx = to.as_ref().map(|d| {
            ps.push(d);
            ps.len()
        });

        let filtering = format!(
            "{search}{status}{method}{land}{customer}{agent}{from}{to}",
            search = search_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(
                    " AND LOWER(business_id || ' ' || receipt_number) \
                       SIMILAR TO LOWER(${idx}::VARCHAR)"
                ))
            }),
            status = status_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(" AND status = ${idx}::INT2"))
            }),
            method = method_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(" AND payment_method = ${idx}::INT2"))
            }),
            land = land_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(" AND land_id = ${idx}::UUID"))
            }),
            customer = customer_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(" AND customer_id = ${idx}::UUID"))
            }),
            agent = agent_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(" AND agent_id = ${idx}::UUID"))
            }),
            from = from_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(" AND transaction_date >= ${idx}::DATE"))
            }),
            to = to_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(" AND transaction_date <= ${idx}::DATE"))
            }),
        );

        let count_sql = format!(
            "SELECT COUNT(*) AS total \
             FROM transactions \
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
             FROM transactions \
             WHERE true{filtering} \
             ORDER BY transaction_date {order}, created_at {order} \
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

        Ok(read::transaction::list::Page::new(
            &arguments,
            items,
            u64::try_from(total).unwrap_or_default(),
        ))
    }
}
