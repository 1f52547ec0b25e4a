//! Non-propagating activity audit logging.

use std::fmt;

use common::{operations::Insert, DateTime};

use crate::{
    domain::{activity, user},
    infra::Database,
    Service,
};

/// Entry to be recorded in the activity log.
///
/// Generated fields (ID and timestamp) are filled in by [`Service::audit()`].
#[derive(Clone, Debug)]
pub struct Entry {
    /// ID of the [`User`] who performed the action.
    ///
    /// [`User`]: crate::domain::User
    pub user_id: user::Id,

    /// Performed [`activity::Action`].
    pub action: activity::Action,

    /// [`activity::Entity`] the action was performed upon.
    pub entity: activity::Entity,

    /// Identifier of the affected entity, if any.
    pub entity_id: Option<String>,

    /// Human-readable description of the action.
    pub description: String,

    /// JSON snapshot of the entity before the action.
    pub old_values: Option<serde_json::Value>,

    /// JSON snapshot of the entity after the action.
    pub new_values: Option<serde_json::Value>,

    /// IP address the request came from.
    pub ip_address: Option<String>,

    /// User agent of the client.
    pub user_agent: Option<String>,
}

impl<Db> Service<Db>
where
    Db: Database<Insert<activity::Entry>, Ok = ()>,
    <Db as Database<Insert<activity::Entry>>>::Err: fmt::Display,
{
    /// Records the provided [`Entry`] in the activity log.
    ///
    /// Auditing never interferes with the audited workflow: any storage
    /// failure is logged and discarded.
    pub async fn audit(&self, entry: Entry) {
        let Entry {
            user_id,
            action,
            entity,
            entity_id,
            description,
            old_values,
            new_values,
            ip_address,
            user_agent,
        } = entry;

        let record = activity::Entry {
            id: activity::Id::new(),
            user_id,
            action,
            entity,
            entity_id,
            description,
            old_values,
            new_values,
            ip_address,
            user_agent,
            created_at: DateTime::now(),
        };

        if let Err(e) = self.database().execute(Insert(record)).await {
            tracing::warn!("failed to record activity log entry: {e}");
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{operations::Insert, Handler};

    use crate::{
        domain::{activity, user},
        Config, Service,
    };

    use super::Entry;

    /// [`Database`] fake rejecting every operation.
    ///
    /// [`Database`]: crate::infra::Database
    #[derive(Clone, Debug)]
    struct FailingDb;

    impl Handler<Insert<activity::Entry>> for FailingDb {
        type Ok = ();
        type Err = &'static str;

        async fn execute(
            &self,
            _: Insert<activity::Entry>,
        ) -> Result<Self::Ok, Self::Err> {
            Err("storage down")
        }
    }

    fn service() -> Service<FailingDb> {
        Service::new(
            Config {
                jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(
                    b"test",
                ),
                jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                    b"test",
                ),
            },
            FailingDb,
        )
    }

    #[test]
    fn swallows_storage_failures() {
        let svc = service();

        // Must complete despite the failing storage.
        futures::executor::block_on(svc.audit(Entry {
            user_id: user::Id::new(),
            action: activity::Action::Create,
            entity: activity::Entity::Land,
            entity_id: Some("LAND-00001".into()),
            description: "created land".into(),
            old_values: None,
            new_values: None,
            ip_address: None,
            user_agent: None,
        }));
    }
}
