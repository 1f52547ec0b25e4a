//! Sequence-backed [`Allocate`] implementations.
//!
//! Human-facing identifiers are numbered out of Postgres sequences, so every
//! allocation observes a distinct number even under concurrent writers.

use common::{operations::Allocate, Date};
use tracerr::Traced;

use crate::{
    domain::{agent, customer, land, transaction},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Allocate<land::BusinessId>> for Postgres<C>
where
    C: Connection,
{
    type Ok = land::BusinessId;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Allocate<land::BusinessId>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "SELECT nextval('lands_business_id_seq') AS seq";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| {
                land::BusinessId::from_seq(
                    row.expect("always exists").get("seq"),
                )
            })
    }
}

impl<C> Database<Allocate<customer::BusinessId>> for Postgres<C>
where
    C: Connection,
{
    type Ok = customer::BusinessId;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Allocate<customer::BusinessId>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "SELECT nextval('customers_business_id_seq') AS seq";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| {
                customer::BusinessId::from_seq(
                    row.expect("always exists").get("seq"),
                )
            })
    }
}

impl<C> Database<Allocate<agent::BusinessId>> for Postgres<C>
where
    C: Connection,
{
    type Ok = agent::BusinessId;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Allocate<agent::BusinessId>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "SELECT nextval('agents_business_id_seq') AS seq";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| {
                agent::BusinessId::from_seq(
                    row.expect("always exists").get("seq"),
                )
            })
    }
}

impl<C> Database<Allocate<transaction::BusinessId>> for Postgres<C>
where
    C: Connection,
{
    type Ok = transaction::BusinessId;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Allocate<transaction::BusinessId>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str =
            "SELECT nextval('transactions_business_id_seq') AS seq";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| {
                transaction::BusinessId::from_seq(
                    Date::today(),
                    row.expect("always exists").get("seq"),
                )
            })
    }
}

impl<C> Database<Allocate<transaction::ReceiptNumber>> for Postgres<C>
where
    C: Connection,
{
    type Ok = transaction::ReceiptNumber;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Allocate<transaction::ReceiptNumber>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "SELECT nextval('receipts_seq') AS seq";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| {
                transaction::ReceiptNumber::from_seq(
                    row.expect("always exists").get("seq"),
                )
            })
    }
}
