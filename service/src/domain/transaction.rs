//! [`Transaction`] definitions.

use std::{str::FromStr, sync::LazyLock};

use common::{define_kind, Date, DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{agent, customer, land, FileRef};

/// Payment recorded against a [`Land`] sale.
///
/// [`Land`]: super::Land
#[derive(Clone, Debug)]
pub struct Transaction {
    /// ID of this [`Transaction`].
    pub id: Id,

    /// Human-facing [`BusinessId`] of this [`Transaction`].
    pub business_id: BusinessId,

    /// [`ReceiptNumber`] issued for this [`Transaction`].
    pub receipt_number: ReceiptNumber,

    /// ID of the [`Land`] this [`Transaction`] pays for.
    ///
    /// [`Land`]: super::Land
    pub land_id: land::Id,

    /// ID of the paying [`Customer`].
    ///
    /// [`Customer`]: super::Customer
    pub customer_id: customer::Id,

    /// ID of the [`Agent`] who brokered this [`Transaction`].
    ///
    /// [`Agent`]: super::Agent
    pub agent_id: Option<agent::Id>,

    /// Paid amount.
    pub amount: Money,

    /// [`Method`] the payment was made with.
    pub payment_method: Method,

    /// [`PaymentKind`] of the payment.
    pub payment_kind: PaymentKind,

    /// 1-based number of the installment, for installment payments.
    pub installment_number: Option<i32>,

    /// Total number of planned installments.
    pub total_installments: Option<i32>,

    /// [`Date`] the payment was made on.
    pub transaction_date: Date,

    /// Reference to the uploaded receipt file.
    pub receipt_file: Option<FileRef>,

    /// Cheque number, for cheque payments.
    pub cheque_number: Option<String>,

    /// [`Date`] on the cheque, for cheque payments.
    pub cheque_date: Option<Date>,

    /// Bank reference of the payment, if any.
    pub bank_reference: Option<String>,

    /// [`Status`] of this [`Transaction`].
    pub status: Status,

    /// Free-form notes about this [`Transaction`].
    pub notes: Option<String>,

    /// Commission earned by the [`Agent`] on this [`Transaction`].
    ///
    /// Zero when no [`Agent`] brokered it.
    ///
    /// [`Agent`]: super::Agent
    pub commission: Money,

    /// Indicator whether the [`Transaction::commission`] has been paid out.
    pub commission_paid: bool,

    /// [`DateTime`] when this [`Transaction`] was created.
    pub created_at: DateTime,
}

/// ID of a [`Transaction`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    derive_more::FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Human-facing identifier of a [`Transaction`] (`TXN-20240307-0042`).
///
/// Embeds the [`Date`] the [`Transaction`] was recorded on; the trailing
/// counter is global, not per-day.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct BusinessId(String);

impl BusinessId {
    /// Formats a new [`BusinessId`] out of the recording [`Date`] and the
    /// allocated sequence number.
    #[must_use]
    pub fn from_seq(date: Date, seq: i64) -> Self {
        Self(format!("TXN-{}-{seq:04}", date.compact()))
    }

    /// Creates a new [`BusinessId`] if the given `id` is valid.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        Self::check(&id).then_some(Self(id))
    }

    /// Checks whether the given `id` is a valid [`BusinessId`].
    fn check(id: impl AsRef<str>) -> bool {
        /// Regular expression checking [`BusinessId`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^TXN-\d{8}-\d{4,}$").expect("valid regex")
        });

        REGEX.is_match(id.as_ref())
    }
}

impl FromStr for BusinessId {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `transaction::BusinessId`")
    }
}

/// Receipt number issued for a [`Transaction`] (`RCP-000042`).
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct ReceiptNumber(String);

impl ReceiptNumber {
    /// Formats a new [`ReceiptNumber`] out of the allocated sequence number.
    #[must_use]
    pub fn from_seq(seq: i64) -> Self {
        Self(format!("RCP-{seq:06}"))
    }

    /// Creates a new [`ReceiptNumber`] if the given `num` is valid.
    #[must_use]
    pub fn new(num: impl Into<String>) -> Option<Self> {
        let num = num.into();
        Self::check(&num).then_some(Self(num))
    }

    /// Checks whether the given `num` is a valid [`ReceiptNumber`].
    fn check(num: impl AsRef<str>) -> bool {
        /// Regular expression checking [`ReceiptNumber`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^RCP-\d{6,}$").expect("valid regex")
        });

        REGEX.is_match(num.as_ref())
    }
}

impl FromStr for ReceiptNumber {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ReceiptNumber`")
    }
}

define_kind! {
    #[doc = "Method a [`Transaction`] payment was made with."]
    enum Method {
        #[doc = "Cash payment."]
        Cash = 1,

        #[doc = "Cheque payment."]
        Cheque = 2,

        #[doc = "Bank transfer."]
        BankTransfer = 3,

        #[doc = "UPI payment."]
        Upi = 4,

        #[doc = "Card payment."]
        Card = 5,

        #[doc = "Any other method."]
        Other = 6,
    }
}

define_kind! {
    #[doc = "Kind of a [`Transaction`] payment."]
    enum PaymentKind {
        #[doc = "Full payment of the sale price."]
        Full = 1,

        #[doc = "One of the agreed installments."]
        Installment = 2,

        #[doc = "Advance payment."]
        Advance = 3,

        #[doc = "Token amount to hold the parcel."]
        Token = 4,
    }
}

define_kind! {
    #[doc = "Status of a [`Transaction`]."]
    enum Status {
        #[doc = "Awaiting confirmation."]
        Pending = 1,

        #[doc = "Settled."]
        Completed = 2,

        #[doc = "Failed to settle."]
        Failed = 3,

        #[doc = "Refunded to the customer."]
        Refunded = 4,
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::Date;

    use super::{BusinessId, ReceiptNumber};

    #[test]
    fn business_id_embeds_date() {
        let date = Date::from_str("2024-03-07").unwrap();
        assert_eq!(
            BusinessId::from_seq(date, 42).to_string(),
            "TXN-20240307-0042",
        );
        assert_eq!(
            BusinessId::from_seq(date, 12_345).to_string(),
            "TXN-20240307-12345",
        );

        assert!(BusinessId::new("TXN-20240307-0042").is_some());
        assert!(BusinessId::new("TXN-2024037-0042").is_none());
        assert!(BusinessId::new("TXN-0042").is_none());
    }

    #[test]
    fn formats_receipt_number() {
        assert_eq!(ReceiptNumber::from_seq(7).to_string(), "RCP-000007");
        assert_eq!(
            ReceiptNumber::from_seq(1_000_000).to_string(),
            "RCP-1000000",
        );

        assert!(ReceiptNumber::new("RCP-000007").is_some());
        assert!(ReceiptNumber::new("RCP-7").is_none());
    }
}
