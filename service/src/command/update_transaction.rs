//! [`Command`] for updating an existing [`Transaction`].

use common::{
    operations::{By, Select, Update},
    Date, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{agent, transaction, Agent, FileRef, Transaction},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an existing [`Transaction`].
///
/// Absent fields keep their current values. Changing the amount or the
/// involved [`Agent`] recomputes the commission, while the [`Land`] lifecycle
/// and the [`Agent`]'s accrued totals are left untouched.
///
/// [`Land`]: crate::domain::Land
#[derive(Clone, Debug, Default)]
pub struct UpdateTransaction {
    /// ID of the [`Transaction`] to update.
    pub id: transaction::Id,

    /// New involved [`agent::Id`].
    pub agent_id: Option<agent::Id>,

    /// New paid amount.
    pub amount: Option<Money>,

    /// New payment method.
    pub payment_method: Option<transaction::Method>,

    /// New payment kind.
    pub payment_kind: Option<transaction::PaymentKind>,

    /// New installment ordinal number.
    pub installment_number: Option<i32>,

    /// New total number of planned installments.
    pub total_installments: Option<i32>,

    /// New payment [`Date`].
    pub transaction_date: Option<Date>,

    /// New reference to the uploaded receipt document.
    pub receipt_file: Option<FileRef>,

    /// New cheque number.
    pub cheque_number: Option<String>,

    /// New cheque [`Date`].
    pub cheque_date: Option<Date>,

    /// New bank reference number.
    pub bank_reference: Option<String>,

    /// New [`transaction::Status`].
    pub status: Option<transaction::Status>,

    /// New free-form notes.
    pub notes: Option<String>,
}

/// Output of [`UpdateTransaction`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Transaction`] as it was before the update.
    pub before: Transaction,

    /// [`Transaction`] as it is after the update.
    pub after: Transaction,
}

impl<Db> Command<UpdateTransaction> for Service<Db>
where
    Db: Database<
            Select<By<Option<Transaction>, transaction::Id>>,
            Ok = Option<Transaction>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Agent>, agent::Id>>,
            Ok = Option<Agent>,
            Err = Traced<database::Error>,
        > + Database<Update<Transaction>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateTransaction,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateTransaction {
            id,
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
        } = cmd;

        let before = self
            .database()
            .execute(Select(By::<Option<Transaction>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::TransactionNotExists(id))
            .map_err(tracerr::wrap!())?;

        let mut after = before.clone();
        if let Some(v) = agent_id {
            after.agent_id = Some(v);
        }
        if let Some(v) = amount {
            after.amount = v;
        }
        if let Some(v) = payment_method {
            after.payment_method = v;
        }
        if let Some(v) = payment_kind {
            after.payment_kind = v;
        }
        if let Some(v) = installment_number {
            after.installment_number = Some(v);
        }
        if let Some(v) = total_installments {
            after.total_installments = Some(v);
        }
        if let Some(v) = transaction_date {
            after.transaction_date = v;
        }
        if let Some(v) = receipt_file {
            after.receipt_file = Some(v);
        }
        if let Some(v) = cheque_number {
            after.cheque_number = Some(v);
        }
        if let Some(v) = cheque_date {
            after.cheque_date = Some(v);
        }
        if let Some(v) = bank_reference {
            after.bank_reference = Some(v);
        }
        if let Some(v) = status {
            after.status = v;
        }
        if let Some(v) = notes {
            after.notes = Some(v);
        }

        if after.amount != before.amount || after.agent_id != before.agent_id {
            // A dangling agent reference is tolerated: the commission is
            // recomputed as if no agent were involved.
            let agent = match after.agent_id {
                Some(agent_id) => self
                    .database()
                    .execute(Select(By::<Option<Agent>, _>::new(agent_id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?,
                None => None,
            };
            after.agent_id = agent.as_ref().map(|a| a.id);
            after.commission = agent
                .map_or(Money::ZERO, |a| a.commission_percent.of(after.amount));
        }

        self.database()
            .execute(Update(after.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output { before, after })
    }
}

/// Error of [`UpdateTransaction`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Transaction`] with the provided ID does not exist.
    #[display("`Transaction(id: {_0})` does not exist")]
    TransactionNotExists(#[error(not(source))] transaction::Id),
}

#[cfg(test)]
mod spec {
    use std::sync::{Arc, Mutex};

    use common::{
        operations::{By, Select, Update},
        Date, DateTime, Handler, Money, Percent,
    };
    use futures::executor::block_on;
    use jsonwebtoken::{DecodingKey, EncodingKey};
    use tracerr::Traced;

    use crate::{
        domain::{
            agent, contact, customer, land, transaction, Agent, Transaction,
        },
        infra::database,
        Command as _, Config, Service,
    };

    use super::UpdateTransaction;

    #[derive(Clone, Debug, Default)]
    struct FakeDb(Arc<Mutex<State>>);

    #[derive(Debug, Default)]
    struct State {
        transaction: Option<Transaction>,
        agent: Option<Agent>,
    }

    impl Handler<Select<By<Option<Transaction>, transaction::Id>>> for FakeDb {
        type Ok = Option<Transaction>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Select<By<Option<Transaction>, transaction::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(self.0.lock().unwrap().transaction.clone())
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

    impl Handler<Update<Transaction>> for FakeDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Update(transaction): Update<Transaction>,
        ) -> Result<(), Self::Err> {
            self.0.lock().unwrap().transaction = Some(transaction);
            Ok(())
        }
    }

    fn money(s: &str) -> Money {
        s.parse().unwrap()
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

    fn transaction(agent_id: Option<agent::Id>) -> Transaction {
        Transaction {
            id: transaction::Id::new(),
            business_id: transaction::BusinessId::from_seq(Date::today(), 1),
            receipt_number: transaction::ReceiptNumber::from_seq(1),
            land_id: land::Id::new(),
            customer_id: customer::Id::new(),
            agent_id,
            amount: money("1000000"),
            payment_method: transaction::Method::BankTransfer,
            payment_kind: transaction::PaymentKind::Advance,
            installment_number: None,
            total_installments: None,
            transaction_date: Date::today(),
            receipt_file: None,
            cheque_number: None,
            cheque_date: None,
            bank_reference: None,
            status: transaction::Status::Completed,
            notes: None,
            commission: money("25000"),
            commission_paid: false,
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

    #[test]
    fn recomputes_commission_on_amount_change() {
        let agent = agent();
        let transaction = transaction(Some(agent.id));
        let service = service(State {
            transaction: Some(transaction.clone()),
            agent: Some(agent),
        });

        let output = block_on(service.execute(UpdateTransaction {
            id: transaction.id,
            amount: Some(money("2000000")),
            ..UpdateTransaction::default()
        }))
        .unwrap();

        assert_eq!(output.before.commission, money("25000"));
        assert_eq!(output.after.commission, money("50000"));
    }

    #[test]
    fn keeps_commission_on_unrelated_change() {
        let transaction = transaction(Some(agent::Id::new()));
        let service = service(State {
            transaction: Some(transaction.clone()),
            agent: None,
        });

        let output = block_on(service.execute(UpdateTransaction {
            id: transaction.id,
            notes: Some("revised".into()),
            ..UpdateTransaction::default()
        }))
        .unwrap();

        assert_eq!(output.after.commission, money("25000"));
        assert_eq!(output.after.agent_id, transaction.agent_id);
        assert_eq!(output.after.notes.as_deref(), Some("revised"));
    }

    #[test]
    fn dangling_agent_clears_commission() {
        let transaction = transaction(None);
        let service = service(State {
            transaction: Some(transaction.clone()),
            agent: None,
        });

        let output = block_on(service.execute(UpdateTransaction {
            id: transaction.id,
            agent_id: Some(agent::Id::new()),
            ..UpdateTransaction::default()
        }))
        .unwrap();

        assert_eq!(output.after.commission, Money::ZERO);
        assert_eq!(output.after.agent_id, None);
    }
}
