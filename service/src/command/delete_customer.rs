//! [`Command`] for deleting a [`Customer`].

use common::operations::{By, Delete, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{customer, Customer},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for deleting a [`Customer`].
///
/// Deletion is blocked while any [`Transaction`] references the [`Customer`].
///
/// [`Transaction`]: crate::domain::Transaction
#[derive(Clone, Copy, Debug, From)]
pub struct DeleteCustomer {
    /// ID of the [`Customer`] to delete.
    pub id: customer::Id,
}

impl<Db> Command<DeleteCustomer> for Service<Db>
where
    Db: Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::customer::HasTransactions, customer::Id>>,
            Ok = read::customer::HasTransactions,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Customer, customer::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = Customer;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteCustomer,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteCustomer { id } = cmd;

        let customer = self
            .database()
            .execute(Select(By::<Option<Customer>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CustomerNotExists(id))
            .map_err(tracerr::wrap!())?;

        let has_transactions = self
            .database()
            .execute(Select(By::<read::customer::HasTransactions, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if *has_transactions {
            return Err(tracerr::new!(E::CustomerHasTransactions(id)));
        }

        self.database()
            .execute(Delete(By::<Customer, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(customer)
    }
}

/// Error of [`DeleteCustomer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] is referenced by [`Transaction`]s.
    ///
    /// [`Transaction`]: crate::domain::Transaction
    #[display("`Customer(id: {_0})` is referenced by transactions")]
    CustomerHasTransactions(#[error(not(source))] customer::Id),

    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use std::sync::{Arc, Mutex};

    use common::{
        operations::{By, Delete, Select},
        DateTime, Handler,
    };
    use futures::executor::block_on;
    use jsonwebtoken::{DecodingKey, EncodingKey};
    use tracerr::Traced;

    use crate::{
        domain::{contact, customer, Customer},
        infra::database,
        read, Command as _, Config, Service,
    };

    use super::{DeleteCustomer, ExecutionError};

    #[derive(Clone, Debug, Default)]
    struct FakeDb(Arc<Mutex<State>>);

    #[derive(Debug, Default)]
    struct State {
        customer: Option<Customer>,
        has_transactions: bool,
    }

    impl Handler<Select<By<Option<Customer>, customer::Id>>> for FakeDb {
        type Ok = Option<Customer>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Select<By<Option<Customer>, customer::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(self.0.lock().unwrap().customer.clone())
        }
    }

    impl Handler<Select<By<read::customer::HasTransactions, customer::Id>>>
        for FakeDb
    {
        type Ok = read::customer::HasTransactions;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Select<By<read::customer::HasTransactions, customer::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(read::customer::HasTransactions(
                self.0.lock().unwrap().has_transactions,
            ))
        }
    }

    impl Handler<Delete<By<Customer, customer::Id>>> for FakeDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Delete<By<Customer, customer::Id>>,
        ) -> Result<(), Self::Err> {
            self.0.lock().unwrap().customer = None;
            Ok(())
        }
    }

    fn customer() -> Customer {
        Customer {
            id: customer::Id::new(),
            business_id: customer::BusinessId::from_seq(1),
            name: contact::Name::new("Asha Rao").unwrap(),
            phone: contact::Phone::new("987 654 3210").unwrap(),
            email: None,
            address: None,
            city: None,
            state: None,
            pincode: None,
            id_proof_kind: None,
            id_proof_number: None,
            id_proof_file: None,
            is_active: true,
            notes: None,
            created_at: DateTime::now(),
        }
    }

    fn service(db: FakeDb) -> Service<FakeDb> {
        Service::new(
            Config {
                jwt_encoding_key: EncodingKey::from_secret(b"secret"),
                jwt_decoding_key: DecodingKey::from_secret(b"secret"),
            },
            db,
        )
    }

    #[test]
    fn refuses_while_transactions_exist() {
        let customer = customer();
        let db = FakeDb(Arc::new(Mutex::new(State {
            customer: Some(customer.clone()),
            has_transactions: true,
        })));
        let service = service(db.clone());

        let result =
            block_on(service.execute(DeleteCustomer { id: customer.id }));

        assert!(matches!(
            result.unwrap_err().into_inner(),
            ExecutionError::CustomerHasTransactions(_),
        ));
        assert!(db.0.lock().unwrap().customer.is_some());
    }

    #[test]
    fn deletes_unreferenced_customer() {
        let customer = customer();
        let db = FakeDb(Arc::new(Mutex::new(State {
            customer: Some(customer.clone()),
            has_transactions: false,
        })));
        let service = service(db.clone());

        let deleted =
            block_on(service.execute(DeleteCustomer { id: customer.id }))
                .unwrap();

        assert_eq!(deleted.id, customer.id);
        assert!(db.0.lock().unwrap().customer.is_none());
    }
}
