//! ValidateMemberRegistrationHandler - Pre-commit checks for a new member.
//!
//! Runs every consistency rule a new member record must satisfy before the
//! persistence layer writes it:
//!
//! 1. Structural validation (`Member::construct`)
//! 2. Member id not already taken
//! 3. Every course, group and event reference exists
//! 4. Email not already used by another member
//!
//! Steps 2 and 3 share one snapshot. Step 4 reads outside it, so two
//! concurrent registrations with the same email can both pass.

use std::collections::HashSet;

use futures::future::try_join_all;
use thiserror::Error;
use tracing::{debug, info};

use crate::application::validation::{ConsistencyError, ConsistencyValidator};
use crate::domain::foundation::{Collection, CollectionRef, ErrorCode, ValidationError};
use crate::domain::member::{Member, MemberFields};
use crate::ports::{FieldValue, TransactionContext};

/// Command to validate a member registration.
#[derive(Debug, Clone)]
pub struct ValidateMemberRegistrationCommand {
    pub fields: MemberFields,
}

/// Result of a successful validation.
#[derive(Debug, Clone)]
pub struct ValidateMemberRegistrationResult {
    /// The validated member, ready to be persisted.
    pub member: Member,
}

/// Reasons a registration is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("A document in {collection} already has this {field}")]
    Duplicate {
        collection: Collection,
        field: &'static str,
    },

    #[error("Referenced documents do not exist: {}", join_refs(.0))]
    DanglingReferences(Vec<CollectionRef>),

    #[error(transparent)]
    Store(ConsistencyError),
}

fn join_refs(refs: &[CollectionRef]) -> String {
    refs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl RegistrationError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            RegistrationError::Invalid(err) => err.code(),
            RegistrationError::Duplicate { .. } => ErrorCode::DuplicateValue,
            RegistrationError::DanglingReferences(_) => ErrorCode::DanglingReference,
            RegistrationError::Store(err) => err.code(),
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RegistrationError::Store(err) if err.is_retryable())
    }
}

impl From<ConsistencyError> for RegistrationError {
    fn from(err: ConsistencyError) -> Self {
        match err {
            ConsistencyError::Validation(inner) => RegistrationError::Invalid(inner),
            other => RegistrationError::Store(other),
        }
    }
}

/// Handler for validating member registrations.
pub struct ValidateMemberRegistrationHandler {
    validator: ConsistencyValidator,
}

impl ValidateMemberRegistrationHandler {
    pub fn new(validator: ConsistencyValidator) -> Self {
        Self { validator }
    }

    pub async fn handle(
        &self,
        cmd: ValidateMemberRegistrationCommand,
    ) -> Result<ValidateMemberRegistrationResult, RegistrationError> {
        // 1. Structural validation, no I/O
        let member = Member::construct(cmd.fields)?;

        // 2-3. Identity and references, in one snapshot
        let tx = self.validator.begin_snapshot().await.map_err(|source| {
            ConsistencyError::store_access(Collection::Members, member.id().as_str(), source)
        })?;
        let outcome = self.check_in_snapshot(&member, &tx).await;
        // A failed end is logged by end_snapshot and must not mask `outcome`.
        self.validator.end_snapshot(&tx).await.ok();
        outcome?;

        // 4. Email uniqueness, outside the snapshot
        if let Some(email) = member.email() {
            let unique = self
                .validator
                .is_unique(Collection::Members, "email", &FieldValue::from(email.as_str()))
                .await?;
            if !unique {
                return Err(RegistrationError::Duplicate {
                    collection: Collection::Members,
                    field: "email",
                });
            }
        }

        info!(
            member_id = %member.id(),
            member_type = %member.member_type(),
            references = member.courses().len() + member.groups().len() + member.events().len(),
            "Member registration validated"
        );
        Ok(ValidateMemberRegistrationResult { member })
    }

    async fn check_in_snapshot(
        &self,
        member: &Member,
        tx: &TransactionContext,
    ) -> Result<(), RegistrationError> {
        if self
            .validator
            .member_exists(member.id().as_str(), Some(tx))
            .await?
        {
            return Err(RegistrationError::Duplicate {
                collection: Collection::Members,
                field: "id",
            });
        }

        // Each distinct reference is checked and reported once.
        let mut seen = HashSet::new();
        let references = member
            .courses()
            .iter()
            .map(|id| (Collection::Courses, id.as_str()))
            .chain(member.groups().iter().map(|id| (Collection::Groups, id.as_str())))
            .chain(member.events().iter().map(|id| (Collection::Events, id.as_str())))
            .filter(move |reference| seen.insert(*reference));

        let checks = references.map(move |(collection, id)| async move {
            let found = self.validator.exists(collection, id, Some(tx)).await?;
            Ok::<_, ConsistencyError>((!found).then(|| CollectionRef::new(collection, id)))
        });

        let dangling: Vec<CollectionRef> = try_join_all(checks).await?.into_iter().flatten().collect();
        if !dangling.is_empty() {
            debug!(
                member_id = %member.id(),
                dangling = dangling.len(),
                "Member references missing documents"
            );
            return Err(RegistrationError::DanglingReferences(dangling));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryDocumentStore;
    use crate::ports::StoreError;
    use serde_json::{json, Map, Value};
    use std::sync::Arc;

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn doc(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fields must be a JSON object"),
        }
    }

    async fn seeded_store() -> Arc<InMemoryDocumentStore> {
        let store = Arc::new(InMemoryDocumentStore::new());
        store.insert("courses", "bible-101", Map::new()).await;
        store.insert("groups", "choir", Map::new()).await;
        store.insert("events", "retreat-2024", Map::new()).await;
        store
            .insert("members", "m-0", doc(json!({"email": "taken@example.org"})))
            .await;
        store
    }

    fn handler(store: Arc<InMemoryDocumentStore>) -> ValidateMemberRegistrationHandler {
        ValidateMemberRegistrationHandler::new(ConsistencyValidator::new(store))
    }

    fn fields() -> MemberFields {
        MemberFields {
            email: Some("ana@example.org".to_string()),
            courses: Some(vec!["bible-101".to_string()]),
            groups: Some(vec!["choir".to_string()]),
            events: Some(vec!["retreat-2024".to_string()]),
            ..MemberFields::new("m-1", "Ana", "Baptized")
        }
    }

    fn command(fields: MemberFields) -> ValidateMemberRegistrationCommand {
        ValidateMemberRegistrationCommand { fields }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Success Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn accepts_member_with_valid_references() {
        let store = seeded_store().await;
        let result = handler(store.clone()).handle(command(fields())).await.unwrap();

        assert_eq!(result.member.id().as_str(), "m-1");
        assert_eq!(store.open_transaction_count().await, 0);
    }

    #[tokio::test]
    async fn accepts_member_without_references_or_email() {
        let store = seeded_store().await;
        let result = handler(store)
            .handle(command(MemberFields::new("m-2", "Bea", "Visitor")))
            .await;
        assert!(result.is_ok());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Failure Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn structural_errors_come_first() {
        let store = seeded_store().await;
        store
            .fail_with(StoreError::Connection("down".to_string()))
            .await;

        let err = handler(store)
            .handle(command(MemberFields::new("m-1", "Ana", "Member")))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::InvalidEnum);
    }

    #[tokio::test]
    async fn rejects_taken_member_id() {
        let store = seeded_store().await;
        let fields = MemberFields {
            id: Some("m-0".to_string()),
            ..fields()
        };

        let err = handler(store.clone()).handle(command(fields)).await.unwrap_err();

        assert_eq!(
            err,
            RegistrationError::Duplicate {
                collection: Collection::Members,
                field: "id"
            }
        );
        assert_eq!(store.open_transaction_count().await, 0);
    }

    #[tokio::test]
    async fn reports_every_dangling_reference() {
        let store = seeded_store().await;
        let fields = MemberFields {
            courses: Some(vec!["bible-101".to_string(), "missing-course".to_string()]),
            events: Some(vec!["missing-event".to_string()]),
            ..fields()
        };

        let err = handler(store).handle(command(fields)).await.unwrap_err();

        assert_eq!(
            err,
            RegistrationError::DanglingReferences(vec![
                CollectionRef::new(Collection::Courses, "missing-course"),
                CollectionRef::new(Collection::Events, "missing-event"),
            ])
        );
        assert_eq!(err.code(), ErrorCode::DanglingReference);
    }

    #[tokio::test]
    async fn repeated_dangling_reference_is_reported_once() {
        let store = seeded_store().await;
        let fields = MemberFields {
            courses: Some(vec![
                "missing-course".to_string(),
                "bible-101".to_string(),
                "missing-course".to_string(),
            ]),
            ..fields()
        };

        let err = handler(store).handle(command(fields)).await.unwrap_err();

        assert_eq!(
            err,
            RegistrationError::DanglingReferences(vec![CollectionRef::new(
                Collection::Courses,
                "missing-course"
            )])
        );
        assert_eq!(
            err.to_string(),
            "Referenced documents do not exist: courses/missing-course"
        );
    }

    #[tokio::test]
    async fn same_id_in_different_collections_is_checked_separately() {
        let store = seeded_store().await;
        let fields = MemberFields {
            courses: Some(vec!["choir".to_string()]),
            groups: Some(vec!["choir".to_string()]),
            events: None,
            ..fields()
        };

        let err = handler(store).handle(command(fields)).await.unwrap_err();

        assert_eq!(
            err,
            RegistrationError::DanglingReferences(vec![CollectionRef::new(
                Collection::Courses,
                "choir"
            )])
        );
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        let store = seeded_store().await;
        let fields = MemberFields {
            email: Some("taken@example.org".to_string()),
            ..fields()
        };

        let err = handler(store).handle(command(fields)).await.unwrap_err();

        assert_eq!(
            err,
            RegistrationError::Duplicate {
                collection: Collection::Members,
                field: "email"
            }
        );
    }

    #[tokio::test]
    async fn store_failure_is_retryable_and_releases_nothing() {
        let store = seeded_store().await;
        store
            .fail_with(StoreError::Connection("down".to_string()))
            .await;

        let err = handler(store.clone()).handle(command(fields())).await.unwrap_err();

        assert!(matches!(err, RegistrationError::Store(_)));
        assert!(err.is_retryable());
        assert_eq!(store.open_transaction_count().await, 0);
    }

    #[test]
    fn dangling_display_lists_references() {
        let err = RegistrationError::DanglingReferences(vec![
            CollectionRef::new(Collection::Courses, "c-1"),
            CollectionRef::new(Collection::Groups, "g-1"),
        ]);
        assert_eq!(
            err.to_string(),
            "Referenced documents do not exist: courses/c-1, groups/g-1"
        );
    }
}
