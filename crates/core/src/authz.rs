//! Caller context and the central (resource, operation) -> role policy table.
//!
//! Handlers never inspect role names themselves. They build a
//! [`CallerContext`] from the request and call [`CallerContext::authorize`]
//! before touching storage, so the whole mapping lives in [`POLICY`] and can
//! be tested without a server.

use serde::Serialize;

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Resources and operations
// ---------------------------------------------------------------------------

/// Resource families guarded by the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    News,
    Project,
    ContactMessage,
    Dashboard,
}

/// Operations a caller may attempt on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Public listing (published/active only).
    ListPublic,
    /// Public detail (published/active only).
    ViewPublic,
    /// Anonymous submission (contact form).
    Submit,
    /// Staff listing, no visibility predicate.
    List,
    /// Staff detail.
    View,
    Create,
    Edit,
    /// Flip a boolean state flag.
    Toggle,
    Delete,
    BulkDelete,
    Export,
}

/// Who may perform an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone, including anonymous callers.
    Anonymous,
    /// Authenticated callers holding at least one of the listed roles.
    Roles(&'static [Role]),
}

const STAFF: &[Role] = &[Role::Admin, Role::Editor];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// The closed policy table. Pairs missing from the table are denied.
pub const POLICY: &[(Resource, Operation, Access)] = &[
    // News
    (Resource::News, Operation::ListPublic, Access::Anonymous),
    (Resource::News, Operation::ViewPublic, Access::Anonymous),
    (Resource::News, Operation::List, Access::Roles(STAFF)),
    (Resource::News, Operation::View, Access::Roles(STAFF)),
    (Resource::News, Operation::Create, Access::Roles(STAFF)),
    (Resource::News, Operation::Edit, Access::Roles(STAFF)),
    (Resource::News, Operation::Toggle, Access::Roles(STAFF)),
    (Resource::News, Operation::Delete, Access::Roles(ADMIN_ONLY)),
    // Projects
    (Resource::Project, Operation::ListPublic, Access::Anonymous),
    (Resource::Project, Operation::List, Access::Roles(STAFF)),
    (Resource::Project, Operation::View, Access::Roles(STAFF)),
    (Resource::Project, Operation::Create, Access::Roles(STAFF)),
    (Resource::Project, Operation::Edit, Access::Roles(STAFF)),
    (Resource::Project, Operation::Toggle, Access::Roles(STAFF)),
    (Resource::Project, Operation::Delete, Access::Roles(ADMIN_ONLY)),
    // Contact messages
    (Resource::ContactMessage, Operation::Submit, Access::Anonymous),
    (Resource::ContactMessage, Operation::List, Access::Roles(ADMIN_ONLY)),
    (Resource::ContactMessage, Operation::View, Access::Roles(ADMIN_ONLY)),
    (Resource::ContactMessage, Operation::Toggle, Access::Roles(ADMIN_ONLY)),
    (Resource::ContactMessage, Operation::Delete, Access::Roles(ADMIN_ONLY)),
    (Resource::ContactMessage, Operation::BulkDelete, Access::Roles(ADMIN_ONLY)),
    (Resource::ContactMessage, Operation::Export, Access::Roles(ADMIN_ONLY)),
    // Dashboard
    (Resource::Dashboard, Operation::View, Access::Roles(ADMIN_ONLY)),
];

/// Look up the access rule for a pair. `None` means the pair is not offered.
pub fn required_access(resource: Resource, operation: Operation) -> Option<Access> {
    POLICY
        .iter()
        .find(|(r, o, _)| *r == resource && *o == operation)
        .map(|(_, _, access)| *access)
}

// ---------------------------------------------------------------------------
// Caller context
// ---------------------------------------------------------------------------

/// An authenticated staff identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: DbId,
    pub roles: Vec<Role>,
}

/// Who is making the current request. Threaded explicitly into every
/// operation instead of being read from ambient state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext {
    identity: Option<Identity>,
}

impl CallerContext {
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    pub fn authenticated(user_id: DbId, roles: Vec<Role>) -> Self {
        Self {
            identity: Some(Identity { user_id, roles }),
        }
    }

    pub fn user_id(&self) -> Option<DbId> {
        self.identity.as_ref().map(|i| i.user_id)
    }

    /// Check the policy table for `(resource, operation)`.
    ///
    /// - Anonymous caller on a role-guarded pair: [`CoreError::Unauthorized`].
    /// - Authenticated caller lacking every listed role: [`CoreError::Forbidden`].
    /// - Pair absent from the table: [`CoreError::Forbidden`].
    pub fn authorize(&self, resource: Resource, operation: Operation) -> Result<(), CoreError> {
        match required_access(resource, operation) {
            Some(Access::Anonymous) => Ok(()),
            Some(Access::Roles(allowed)) => {
                let identity = self.identity.as_ref().ok_or_else(|| {
                    CoreError::Unauthorized("Authentication required".into())
                })?;
                if identity.roles.iter().any(|r| allowed.contains(r)) {
                    Ok(())
                } else {
                    Err(CoreError::Forbidden(format!(
                        "Insufficient role for {operation:?} on {resource:?}"
                    )))
                }
            }
            None => Err(CoreError::Forbidden(format!(
                "{operation:?} is not available on {resource:?}"
            ))),
        }
    }
}
