//! [`Command`] for updating an existing [`Customer`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contact, customer, Customer, FileRef},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an existing [`Customer`].
///
/// Absent fields keep their current values.
#[derive(Clone, Debug, Default)]
pub struct UpdateCustomer {
    /// ID of the [`Customer`] to update.
    pub id: customer::Id,

    /// New [`contact::Name`].
    pub name: Option<contact::Name>,

    /// New [`contact::Phone`].
    pub phone: Option<contact::Phone>,

    /// New [`contact::Email`].
    pub email: Option<contact::Email>,

    /// New postal address.
    pub address: Option<String>,

    /// New city.
    pub city: Option<String>,

    /// New state.
    pub state: Option<String>,

    /// New postal code.
    pub pincode: Option<String>,

    /// New [`customer::IdProofKind`].
    pub id_proof_kind: Option<customer::IdProofKind>,

    /// New identity proof number.
    pub id_proof_number: Option<String>,

    /// New reference to the uploaded identity proof document.
    pub id_proof_file: Option<FileRef>,

    /// New activity indicator.
    pub is_active: Option<bool>,

    /// New free-form notes.
    pub notes: Option<String>,
}

/// Output of [`UpdateCustomer`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Customer`] as it was before the update.
    pub before: Customer,

    /// [`Customer`] as it is after the update.
    pub after: Customer,
}

impl<Db> Command<UpdateCustomer> for Service<Db>
where
    Db: Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<Update<Customer>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateCustomer,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateCustomer {
            id,
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
        } = cmd;

        let before = self
            .database()
            .execute(Select(By::<Option<Customer>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CustomerNotExists(id))
            .map_err(tracerr::wrap!())?;

        let mut after = before.clone();
        if let Some(v) = name {
            after.name = v;
        }
        if let Some(v) = phone {
            after.phone = v;
        }
        if let Some(v) = email {
            after.email = Some(v);
        }
        if let Some(v) = address {
            after.address = Some(v);
        }
        if let Some(v) = city {
            after.city = Some(v);
        }
        if let Some(v) = state {
            after.state = Some(v);
        }
        if let Some(v) = pincode {
            after.pincode = Some(v);
        }
        if let Some(v) = id_proof_kind {
            after.id_proof_kind = Some(v);
        }
        if let Some(v) = id_proof_number {
            after.id_proof_number = Some(v);
        }
        if let Some(v) = id_proof_file {
            after.id_proof_file = Some(v);
        }
        if let Some(v) = is_active {
            after.is_active = v;
        }
        if let Some(v) = notes {
            after.notes = Some(v);
        }

        self.database()
            .execute(Update(after.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output { before, after })
    }
}

/// Error of [`UpdateCustomer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
