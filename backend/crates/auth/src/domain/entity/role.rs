//! Role and Permission Entities
//!
//! Arena-style authorization tables: roles and permissions each live in
//! their own indexed table, and relationships are sets of IDs. There are
//! no embedded back-references (a permission does not know its roles),
//! which keeps the graph acyclic and trivially serializable.

use std::collections::BTreeSet;

use kernel::id::{PermissionId, RoleId};

/// Name of the role granted to every new account
pub const DEFAULT_ROLE: &str = "USER";

/// Permission granted to the default role
pub const DEFAULT_PERMISSION: &str = "READ";

/// A named permission (e.g. `READ`, `WRITE`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub permission_id: PermissionId,
    /// Upper-case name, unique
    pub name: String,
}

impl Permission {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            permission_id: PermissionId::new(),
            name: name.into().to_uppercase(),
        }
    }
}

/// A named role holding a set of permission IDs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub role_id: RoleId,
    /// Upper-case name, unique
    pub name: String,
    /// Join-index into the permission table
    pub permissions: BTreeSet<PermissionId>,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            role_id: RoleId::new(),
            name: name.into().to_uppercase(),
            permissions: BTreeSet::new(),
        }
    }

    /// Attach a permission to this role
    pub fn grant_permission(&mut self, permission_id: PermissionId) {
        self.permissions.insert(permission_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_uppercased() {
        assert_eq!(Role::new("user").name, "USER");
        assert_eq!(Permission::new("read").name, "READ");
    }

    #[test]
    fn test_grant_permission_is_idempotent() {
        let mut role = Role::new("user");
        let permission = Permission::new("read");
        role.grant_permission(permission.permission_id);
        role.grant_permission(permission.permission_id);
        assert_eq!(role.permissions.len(), 1);
    }
}
