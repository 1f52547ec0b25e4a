//! [`Handler`] abstractions.

use std::future::Future;

/// Operation executable against some receiver.
///
/// Commands, queries and database operations all flow through this single
/// seam, so callers can be generic over whoever actually performs the work.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
