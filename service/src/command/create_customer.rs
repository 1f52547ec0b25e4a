//! [`Command`] for creating a new [`Customer`].

use common::{
    operations::{Allocate, Commit, Insert, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contact, customer, Customer, FileRef},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Customer`].
#[derive(Clone, Debug)]
pub struct CreateCustomer {
    /// Name of a new [`Customer`].
    pub name: contact::Name,

    /// Phone number of a new [`Customer`].
    pub phone: contact::Phone,

    /// Email address of a new [`Customer`].
    pub email: Option<contact::Email>,

    /// Postal address of a new [`Customer`].
    pub address: Option<String>,

    /// City of a new [`Customer`].
    pub city: Option<String>,

    /// State of a new [`Customer`].
    pub state: Option<String>,

    /// Postal code of a new [`Customer`].
    pub pincode: Option<String>,

    /// Kind of the provided identity proof.
    pub id_proof_kind: Option<customer::IdProofKind>,

    /// Number of the provided identity proof.
    pub id_proof_number: Option<String>,

    /// Reference to the uploaded identity proof document.
    pub id_proof_file: Option<FileRef>,

    /// Free-form notes about a new [`Customer`].
    pub notes: Option<String>,
}

impl<Db> Command<CreateCustomer> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Allocate<customer::BusinessId>,
            Ok = customer::BusinessId,
            Err = Traced<database::Error>,
        > + Database<Insert<Customer>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Customer;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateCustomer,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateCustomer {
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
            notes,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let business_id = tx
            .execute(Allocate::<customer::BusinessId>::new())
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let customer = Customer {
            id: customer::Id::new(),
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
            is_active: true,
            notes,
            created_at: DateTime::now(),
        };
        tx.execute(Insert(customer.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(customer)
    }
}

/// Error of [`CreateCustomer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
