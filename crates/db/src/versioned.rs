//! Outcome of a write guarded by the `row_version` concurrency token.

use nps_core::error::CoreError;
use nps_core::types::DbId;

/// Result of an `UPDATE ... WHERE id = $1 AND row_version = $n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Versioned<T> {
    /// The row matched and was written.
    Updated(T),
    /// No row with that id exists (deleted concurrently or never existed).
    NotFound,
    /// The row exists but its version moved on since the caller read it.
    Conflict,
}

impl<T> Versioned<T> {
    /// Decide the outcome of a zero-row update from an existence re-check.
    pub fn from_recheck(exists: bool) -> Self {
        if exists {
            Self::Conflict
        } else {
            Self::NotFound
        }
    }

    /// Convert into the domain error taxonomy.
    pub fn into_result(self, entity: &'static str, id: DbId) -> Result<T, CoreError> {
        match self {
            Self::Updated(row) => Ok(row),
            Self::NotFound => Err(CoreError::NotFound { entity, id }),
            Self::Conflict => Err(CoreError::Conflict(format!(
                "{entity} {id} was modified by another request; reload and try again"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn recheck_distinguishes_deleted_from_changed() {
        assert_eq!(Versioned::<()>::from_recheck(true), Versioned::Conflict);
        assert_eq!(Versioned::<()>::from_recheck(false), Versioned::NotFound);
    }

    #[test]
    fn maps_to_core_errors() {
        assert_eq!(Versioned::Updated(5).into_result("Project", 1).unwrap(), 5);
        assert_matches!(
            Versioned::<i32>::NotFound.into_result("Project", 1),
            Err(CoreError::NotFound { entity: "Project", id: 1 })
        );
        assert_matches!(
            Versioned::<i32>::Conflict.into_result("NewsArticle", 2),
            Err(CoreError::Conflict(_))
        );
    }
}
