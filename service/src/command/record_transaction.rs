//! [`Command`] for recording a new payment [`Transaction`].

use common::{
    operations::{
        Allocate, By, Commit, Insert, Lock, Select, Transact, Transacted,
        Update,
    },
    Date, DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        agent, customer, land, transaction, Agent, Customer, Land, Transaction,
    },
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for recording a new payment [`Transaction`].
///
/// Atomically allocates receipt identifiers, stores the [`Transaction`],
/// advances the [`Land`] lifecycle according to the payment kind, and accrues
/// the commission on the involved [`Agent`].
#[derive(Clone, Debug)]
pub struct RecordTransaction {
    /// ID of the [`Land`] being paid for.
    pub land_id: land::Id,

    /// ID of the paying [`Customer`].
    pub customer_id: customer::Id,

    /// ID of the [`Agent`] facilitating the payment, if any.
    ///
    /// An unknown ID is treated as no [`Agent`], yielding no commission.
    pub agent_id: Option<agent::Id>,

    /// Paid amount.
    pub amount: Money,

    /// Method the payment was made with.
    pub payment_method: transaction::Method,

    /// Kind of the payment.
    pub payment_kind: transaction::PaymentKind,

    /// Ordinal number of the installment, for installment payments.
    pub installment_number: Option<i32>,

    /// Total number of planned installments, for installment payments.
    pub total_installments: Option<i32>,

    /// [`Date`] the payment was made on.
    ///
    /// Defaults to today if omitted.
    pub transaction_date: Option<Date>,

    /// Reference to the uploaded receipt document.
    pub receipt_file: Option<crate::domain::FileRef>,

    /// Cheque number, for cheque payments.
    pub cheque_number: Option<String>,

    /// Cheque [`Date`], for cheque payments.
    pub cheque_date: Option<Date>,

    /// Bank reference number, for bank transfers.
    pub bank_reference: Option<String>,

    /// Free-form notes about the payment.
    pub notes: Option<String>,
}

impl<Db> Command<RecordTransaction> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Land, land::Id>>,
            Ok = (),
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
        > + Database<
            Allocate<transaction::BusinessId>,
            Ok = transaction::BusinessId,
            Err = Traced<database::Error>,
        > + Database<
            Allocate<transaction::ReceiptNumber>,
            Ok = transaction::ReceiptNumber,
            Err = Traced<database::Error>,
        > + Database<Insert<Transaction>, Ok = (), Err = Traced<database::Error>>
        + Database<Update<Land>, Ok = (), Err = Traced<database::Error>>
        + Database<Update<Agent>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = read::transaction::Details;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RecordTransaction,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RecordTransaction {
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
            notes,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Land`.
        tx.execute(Lock(By::new(land_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut land = tx
            .execute(Select(By::<Option<Land>, _>::new(land_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::LandNotExists(land_id))
            .map_err(tracerr::wrap!())?;

        let customer = tx
            .execute(Select(By::<Option<Customer>, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CustomerNotExists(customer_id))
            .map_err(tracerr::wrap!())?;

        // A dangling agent reference is tolerated: the payment proceeds
        // without any commission.
        let agent = if let Some(agent_id) = agent_id {
            tx.execute(Select(By::<Option<Agent>, _>::new(agent_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
        } else {
            None
        };

        let business_id = tx
            .execute(Allocate::<transaction::BusinessId>::new())
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let receipt_number = tx
            .execute(Allocate::<transaction::ReceiptNumber>::new())
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let commission = agent
            .as_ref()
            .map_or(Money::ZERO, |a| a.commission_percent.of(amount));

        let transaction = Transaction {
            id: transaction::Id::new(),
            business_id,
            receipt_number,
            land_id,
            customer_id,
            agent_id: agent.as_ref().map(|a| a.id),
            amount,
            payment_method,
            payment_kind,
            installment_number,
            total_installments,
            transaction_date: transaction_date.unwrap_or_else(Date::today),
            receipt_file,
            cheque_number,
            cheque_date,
            bank_reference,
            status: transaction::Status::Completed,
            notes,
            commission,
            commission_paid: false,
            created_at: DateTime::now(),
        };
        tx.execute(Insert(transaction.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        land.apply_payment(payment_kind, customer_id);
        tx.execute(Update(land.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let agent = if let Some(mut agent) = agent {
            agent.total_sales += 1;
            agent.total_commission_earned += commission;
            tx.execute(Update(agent.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            Some(agent)
        } else {
            None
        };

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(read::transaction::Details {
            transaction,
            land,
            customer,
            agent,
        })
    }
}

/// Error of [`RecordTransaction`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Land`] with the provided ID does not exist.
    #[display("`Land(id: {_0})` does not exist")]
    LandNotExists(#[error(not(source))] land::Id),
}

#[cfg(test)]
mod spec {
    use std::sync::{Arc, Mutex};

    use common::{
        operations::{
            Allocate, By, Commit, Insert, Lock, Select, Transact, Update,
        },
        Date, DateTime, Handler, Money, Percent,
    };
    use futures::executor::block_on;
    use jsonwebtoken::{DecodingKey, EncodingKey};
    use rust_decimal::Decimal;
    use tracerr::Traced;

    use crate::{
        domain::{
            agent, contact, customer, land, transaction, Agent, Customer,
            Land, Transaction,
        },
        infra::database,
        Command as _, Config, Service,
    };

    use super::RecordTransaction;

    #[derive(Clone, Debug, Default)]
    struct FakeDb(Arc<Mutex<State>>);

    #[derive(Debug, Default)]
    struct State {
        land: Option<Land>,
        customer: Option<Customer>,
        agent: Option<Agent>,
        transaction: Option<Transaction>,
        seq: i64,
    }

    impl Handler<Transact> for FakeDb {
        type Ok = Self;
        type Err = Traced<database::Error>;

        async fn execute(&self, _: Transact) -> Result<Self, Self::Err> {
            Ok(self.clone())
        }
    }

    impl Handler<Lock<By<Land, land::Id>>> for FakeDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Lock<By<Land, land::Id>>,
        ) -> Result<(), Self::Err> {
            Ok(())
        }
    }

    impl Handler<Select<By<Option<Land>, land::Id>>> for FakeDb {
        type Ok = Option<Land>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Select<By<Option<Land>, land::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(self.0.lock().unwrap().land.clone())
        }
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

    impl Handler<Select<By<Option<Agent>, agent::Id>>> for FakeDb {
        type Ok = Option<Agent>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Select<By<Option<Agent>, agent::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(self.0.lock().unwrap().agent.clone())
        }
    }

    impl Handler<Allocate<transaction::BusinessId>> for FakeDb {
        type Ok = transaction::BusinessId;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Allocate<transaction::BusinessId>,
        ) -> Result<Self::Ok, Self::Err> {
            let mut state = self.0.lock().unwrap();
            state.seq += 1;
            Ok(transaction::BusinessId::from_seq(Date::today(), state.seq))
        }
    }

    impl Handler<Allocate<transaction::ReceiptNumber>> for FakeDb {
        type Ok = transaction::ReceiptNumber;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Allocate<transaction::ReceiptNumber>,
        ) -> Result<Self::Ok, Self::Err> {
            let mut state = self.0.lock().unwrap();
            state.seq += 1;
            Ok(transaction::ReceiptNumber::from_seq(state.seq))
        }
    }

    impl Handler<Insert<Transaction>> for FakeDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Insert(transaction): Insert<Transaction>,
        ) -> Result<(), Self::Err> {
            self.0.lock().unwrap().transaction = Some(transaction);
            Ok(())
        }
    }

    impl Handler<Update<Land>> for FakeDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Update(land): Update<Land>,
        ) -> Result<(), Self::Err> {
            self.0.lock().unwrap().land = Some(land);
            Ok(())
        }
    }

    impl Handler<Update<Agent>> for FakeDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Update(agent): Update<Agent>,
        ) -> Result<(), Self::Err> {
            self.0.lock().unwrap().agent = Some(agent);
            Ok(())
        }
    }

    impl Handler<Commit> for FakeDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(&self, _: Commit) -> Result<(), Self::Err> {
            Ok(())
        }
    }

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn land() -> Land {
        Land {
            id: land::Id::new(),
            business_id: land::BusinessId::from_seq(1),
            location: land::Location::new("Whitefield, Bengaluru").unwrap(),
            area_size: Decimal::from(2400),
            area_unit: land::AreaUnit::Sqft,
            price: money("4800000"),
            survey_number: None,
            kind: land::Kind::Residential,
            status: land::Status::Available,
            description: None,
            documents: vec![],
            coordinates: None,
            purchased_by: None,
            primary_agent_id: None,
            created_at: DateTime::now(),
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

    fn agent() -> Agent {
        Agent {
            id: agent::Id::new(),
            business_id: agent::BusinessId::from_seq(1),
            name: contact::Name::new("Ravi Kumar").unwrap(),
            phone: contact::Phone::new("912 345 6789").unwrap(),
            email: None,
            address: None,
            commission_percent: Percent::new("2.5".parse().unwrap()).unwrap(),
            joining_date: Date::today(),
            is_active: true,
            total_sales: 0,
            total_commission_earned: Money::ZERO,
            bank_name: None,
            bank_account: None,
            bank_ifsc: None,
            notes: None,
            created_at: DateTime::now(),
        }
    }

    fn service(state: State) -> Service<FakeDb> {
        Service::new(
            Config {
                jwt_encoding_key: EncodingKey::from_secret(b"secret"),
                jwt_decoding_key: DecodingKey::from_secret(b"secret"),
            },
            FakeDb(Arc::new(Mutex::new(state))),
        )
    }

    fn cmd(
        land: &Land,
        customer: &Customer,
        agent: Option<&Agent>,
        amount: Money,
        payment_kind: transaction::PaymentKind,
    ) -> RecordTransaction {
        RecordTransaction {
            land_id: land.id,
            customer_id: customer.id,
            agent_id: agent.map(|a| a.id),
            amount,
            payment_method: transaction::Method::BankTransfer,
            payment_kind,
            installment_number: None,
            total_installments: None,
            transaction_date: None,
            receipt_file: None,
            cheque_number: None,
            cheque_date: None,
            bank_reference: None,
            notes: None,
        }
    }

    #[test]
    fn full_payment_sells_land_and_accrues_commission() {
        let (land, customer, agent) = (land(), customer(), agent());
        let service = service(State {
            land: Some(land.clone()),
            customer: Some(customer.clone()),
            agent: Some(agent.clone()),
            ..State::default()
        });

        let details = block_on(service.execute(cmd(
            &land,
            &customer,
            Some(&agent),
            money("4800000"),
            transaction::PaymentKind::Full,
        )))
        .unwrap();

        assert_eq!(details.transaction.commission, money("120000"));
        assert_eq!(details.land.status, land::Status::Sold);
        assert_eq!(details.land.purchased_by, Some(customer.id));

        let agent = details.agent.unwrap();
        assert_eq!(agent.total_sales, 1);
        assert_eq!(agent.total_commission_earned, money("120000"));
    }

    #[test]
    fn partial_payment_reserves_land() {
        let (land, customer, agent) = (land(), customer(), agent());
        let service = service(State {
            land: Some(land.clone()),
            customer: Some(customer.clone()),
            agent: Some(agent.clone()),
            ..State::default()
        });

        let details = block_on(service.execute(cmd(
            &land,
            &customer,
            Some(&agent),
            money("500000"),
            transaction::PaymentKind::Token,
        )))
        .unwrap();

        assert_eq!(details.land.status, land::Status::Reserved);
        assert_eq!(details.land.purchased_by, None);
        assert_eq!(details.transaction.commission, money("12500"));
        assert_eq!(details.agent.unwrap().total_sales, 1);
    }

    #[test]
    fn absent_agent_yields_zero_commission() {
        let (land, customer) = (land(), customer());
        let service = service(State {
            land: Some(land.clone()),
            customer: Some(customer.clone()),
            ..State::default()
        });

        let details = block_on(service.execute(cmd(
            &land,
            &customer,
            None,
            money("500000"),
            transaction::PaymentKind::Advance,
        )))
        .unwrap();

        assert_eq!(details.transaction.commission, Money::ZERO);
        assert!(details.agent.is_none());
    }

    #[test]
    fn dangling_agent_reference_is_ignored() {
        let (land, customer) = (land(), customer());
        let service = service(State {
            land: Some(land.clone()),
            customer: Some(customer.clone()),
            ..State::default()
        });

        let mut cmd = cmd(
            &land,
            &customer,
            None,
            money("500000"),
            transaction::PaymentKind::Advance,
        );
        cmd.agent_id = Some(agent::Id::new());

        let details = block_on(service.execute(cmd)).unwrap();

        assert_eq!(details.transaction.commission, Money::ZERO);
        assert_eq!(details.transaction.agent_id, None);
        assert!(details.agent.is_none());
    }

    #[test]
    fn fails_on_missing_land() {
        let customer = customer();
        let service = service(State {
            customer: Some(customer.clone()),
            ..State::default()
        });

        let result = block_on(service.execute(cmd(
            &land(),
            &customer,
            None,
            money("500000"),
            transaction::PaymentKind::Full,
        )));

        assert!(result.is_err());
    }
}
