//! [`User`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use itertools::Itertools as _;
use tokio_postgres::{types::ToSql, Row};
use tracerr::Traced;

use crate::{
    domain::{contact, user, User},
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

/// Reconstructs a [`User`] from the provided [`Row`].
fn from_row(row: &Row) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        full_name: row.get("full_name"),
        role: row.get("role"),
        is_active: row.get("is_active"),
        last_login_at: row.get("last_login_at"),
        created_at: row.get("created_at"),
    }
}

/// Columns of the `users` table, in the [`from_row`] order.
const COLUMNS: &str = "\
    id, username, email, password_hash, full_name, \
    role, is_active, last_login_at, created_at";

impl<C> Database<Select<By<Option<User>, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: user::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM users \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        self.query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<'u, C> Database<Select<By<Option<User>, &'u user::Username>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'u user::Username>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let username: &user::Username = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM users \
             WHERE username = $1::VARCHAR \
             LIMIT 1",
        );
        self.query_opt(&sql, &[username])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<'e, C> Database<Select<By<Option<User>, &'e contact::Email>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'e contact::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let email: &contact::Email = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM users \
             WHERE email = $1::VARCHAR \
             LIMIT 1",
        );
        self.query_opt(&sql, &[email])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Select<By<read::user::list::Page, read::user::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::user::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::user::list::Page, read::user::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::user::list::Selector {
            arguments,
            filter:
                read::user::list::Filter {
                    search,
                    role,
                    is_active,
                },
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];

        let search_pattern =
            search.as_ref().map(|s| FuzzPattern::new(s.as_ref()));
        let search_idx = search_pattern.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });
        let role_idx = role.as_ref().map(|r| {
            ps.push(r);
            ps.len()
        });
        let is_active_idx = is_active.as_ref().map(|a| {
            ps.push(a);
            ps.len()
        });

        let filtering = format!(
            "{search}{role}{is_active}",
            search = search_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(
                    " AND LOWER(username || ' ' || email \
                       || ' ' || full_name) \
                       SIMILAR TO LOWER(${idx}::VARCHAR)"
                ))
            }),
            role = role_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(" AND role = ${idx}::INT2"))
            }),
            is_active = is_active_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(" AND is_active = ${idx}::BOOL"))
            }),
        );

        let count_sql = format!(
            "SELECT COUNT(*) AS total \
             FROM users \
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
             FROM users \
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

        Ok(read::user::list::Page::new(
            &arguments,
            items,
            u64::try_from(total).unwrap_or_default(),
        ))
    }
}

impl<C> Database<Insert<User>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<User>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(user): Insert<User>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(user)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<User>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(user): Update<User>,
    ) -> Result<Self::Ok, Self::Err> {
        let User {
            id,
            username,
            email,
            password_hash,
            full_name,
            role,
            is_active,
            last_login_at,
            created_at,
        } = user;

        const SQL: &str = "\
            INSERT INTO users (\
                id, username, email, password_hash, full_name, \
                role, is_active, last_login_at, created_at \
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::VARCHAR, \
                $6::INT2, $7::BOOL, $8::TIMESTAMPTZ, $9::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET username = EXCLUDED.username, \
                email = EXCLUDED.email, \
                password_hash = EXCLUDED.password_hash, \
                full_name = EXCLUDED.full_name, \
                role = EXCLUDED.role, \
                is_active = EXCLUDED.is_active, \
                last_login_at = EXCLUDED.last_login_at";
        self.exec(
            SQL,
            &[
                &id,
                &username,
                &email,
                &password_hash,
                &full_name,
                &role,
                &is_active,
                &last_login_at,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
