//! User accounts and the static role-based authorization policy

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Language;

/// A user account on the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub preferred_language: Language,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Authorization levels, a closed set
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Accounting,
    Operations,
    Operator,
    Representative,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Accounting => "accounting",
            Role::Operations => "operations",
            Role::Operator => "operator",
            Role::Representative => "representative",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "accounting" => Some(Role::Accounting),
            "operations" => Some(Role::Operations),
            "operator" => Some(Role::Operator),
            "representative" => Some(Role::Representative),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resources that can be accessed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Registry,
    Product,
    Order,
    Receipt,
    Inventory,
    Fleet,
    Employee,
    Report,
    Notification,
    User,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Registry => "registry",
            Resource::Product => "product",
            Resource::Order => "order",
            Resource::Receipt => "receipt",
            Resource::Inventory => "inventory",
            Resource::Fleet => "fleet",
            Resource::Employee => "employee",
            Resource::Report => "report",
            Resource::Notification => "notification",
            Resource::User => "user",
        }
    }
}

/// Actions that can be performed on resources
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
    Export,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Export => "export",
        }
    }
}

/// A permission granting access to a resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permission {
    pub resource: Resource,
    pub actions: Vec<Action>,
}

const ALL_ACTIONS: [Action; 5] = [
    Action::View,
    Action::Create,
    Action::Edit,
    Action::Delete,
    Action::Export,
];

/// Static authorization policy keyed by role.
///
/// Permissions are derived from the role at request time; nothing is
/// persisted per user.
pub fn role_permissions(role: Role) -> Vec<Permission> {
    let full = |resource| Permission {
        resource,
        actions: ALL_ACTIONS.to_vec(),
    };
    let rw = |resource| Permission {
        resource,
        actions: vec![Action::View, Action::Create, Action::Edit],
    };
    let ro = |resource| Permission {
        resource,
        actions: vec![Action::View],
    };

    match role {
        Role::Admin => vec![
            full(Resource::Registry),
            full(Resource::Product),
            full(Resource::Order),
            full(Resource::Receipt),
            full(Resource::Inventory),
            full(Resource::Fleet),
            full(Resource::Employee),
            full(Resource::Report),
            full(Resource::Notification),
            full(Resource::User),
        ],
        Role::Accounting => vec![
            rw(Resource::Registry),
            rw(Resource::Product),
            rw(Resource::Order),
            ro(Resource::Receipt),
            ro(Resource::Inventory),
            ro(Resource::Fleet),
            Permission {
                resource: Resource::Report,
                actions: vec![Action::View, Action::Export],
            },
            ro(Resource::Notification),
        ],
        Role::Operations => vec![
            ro(Resource::Registry),
            rw(Resource::Product),
            rw(Resource::Order),
            rw(Resource::Receipt),
            rw(Resource::Inventory),
            rw(Resource::Fleet),
            rw(Resource::Employee),
            ro(Resource::Report),
            ro(Resource::Notification),
        ],
        Role::Operator => vec![
            ro(Resource::Product),
            ro(Resource::Order),
            rw(Resource::Receipt),
            ro(Resource::Inventory),
            rw(Resource::Fleet),
            ro(Resource::Notification),
        ],
        Role::Representative => vec![
            rw(Resource::Registry),
            ro(Resource::Product),
            ro(Resource::Order),
            ro(Resource::Notification),
        ],
    }
}

/// Flattened `resource:action` permission strings, the form carried in JWT
/// claims and checked by the request middleware.
pub fn permission_strings(role: Role) -> Vec<String> {
    role_permissions(role)
        .into_iter()
        .flat_map(|p| {
            p.actions
                .into_iter()
                .map(move |a| format!("{}:{}", p.resource.as_str(), a.as_str()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [
            Role::Admin,
            Role::Accounting,
            Role::Operations,
            Role::Operator,
            Role::Representative,
        ] {
            assert_eq!(Role::from_str(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_str("superuser"), None);
    }

    #[test]
    fn test_admin_has_every_permission() {
        let perms = permission_strings(Role::Admin);
        assert!(perms.contains(&"order:delete".to_string()));
        assert!(perms.contains(&"fleet:export".to_string()));
    }

    #[test]
    fn test_operator_cannot_delete_orders() {
        let perms = permission_strings(Role::Operator);
        assert!(perms.contains(&"order:view".to_string()));
        assert!(!perms.contains(&"order:delete".to_string()));
        assert!(perms.contains(&"receipt:create".to_string()));
    }

    #[test]
    fn test_representative_is_registry_scoped() {
        let perms = permission_strings(Role::Representative);
        assert!(perms.contains(&"registry:create".to_string()));
        assert!(!perms.iter().any(|p| p.starts_with("fleet:")));
    }
}
