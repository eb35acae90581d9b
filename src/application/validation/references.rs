//! Existence checks bound to the registry's collections.

use super::{ConsistencyError, ExistenceChecker};
use crate::domain::foundation::Collection;
use crate::ports::TransactionContext;

/// Member, course, group and event existence checks.
///
/// Each method is `ExistenceChecker::exists` with the collection fixed;
/// results pass through unchanged.
#[derive(Clone)]
pub struct ReferenceValidator {
    existence: ExistenceChecker,
}

impl ReferenceValidator {
    pub fn new(existence: ExistenceChecker) -> Self {
        Self { existence }
    }

    pub async fn member_exists(
        &self,
        id: &str,
        tx: Option<&TransactionContext>,
    ) -> Result<bool, ConsistencyError> {
        self.existence.exists(Collection::Members, id, tx).await
    }

    pub async fn course_exists(
        &self,
        id: &str,
        tx: Option<&TransactionContext>,
    ) -> Result<bool, ConsistencyError> {
        self.existence.exists(Collection::Courses, id, tx).await
    }

    pub async fn group_exists(
        &self,
        id: &str,
        tx: Option<&TransactionContext>,
    ) -> Result<bool, ConsistencyError> {
        self.existence.exists(Collection::Groups, id, tx).await
    }

    pub async fn event_exists(
        &self,
        id: &str,
        tx: Option<&TransactionContext>,
    ) -> Result<bool, ConsistencyError> {
        self.existence.exists(Collection::Events, id, tx).await
    }
}
