//! Capability checks
//!
//! A caller must hold the role an operation requires and, for actions scoped
//! to a resource, must be that resource's owner. Nothing here knows how the
//! identity was established; the transport layer builds an [`Actor`] from
//! whatever credential it verified.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use core_kernel::UserId;

/// Role an identity acts under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Posts food listings and decides claims on them
    Donor,
    /// Claims food listings
    Receiver,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Donor => "donor",
            Role::Receiver => "receiver",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthorizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "donor" => Ok(Role::Donor),
            "receiver" => Ok(Role::Receiver),
            other => Err(AuthorizationError::UnknownRole(other.to_string())),
        }
    }
}

/// Authorization failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    #[error("requires role {0}")]
    MissingRole(Role),

    #[error("caller does not own this resource")]
    NotOwner,

    #[error("unknown role '{0}'")]
    UnknownRole(String),
}

/// A verified caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    roles: Vec<Role>,
}

impl Actor {
    pub fn new(id: UserId, roles: impl IntoIterator<Item = Role>) -> Self {
        let mut unique = Vec::new();
        for role in roles {
            if !unique.contains(&role) {
                unique.push(role);
            }
        }
        Self { id, roles: unique }
    }

    /// Builds an actor from role names, ignoring names that are not roles
    pub fn from_role_names<'a>(id: UserId, names: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(id, names.into_iter().filter_map(|n| n.parse().ok()))
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Fails unless the actor holds `role`
    pub fn require_role(&self, role: Role) -> Result<(), AuthorizationError> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(AuthorizationError::MissingRole(role))
        }
    }

    /// Fails unless the actor is `owner`
    pub fn require_owner(&self, owner: UserId) -> Result<(), AuthorizationError> {
        require_owner(self.id, owner)
    }
}

/// Fails unless `caller` is `owner`
pub fn require_owner(caller: UserId, owner: UserId) -> Result<(), AuthorizationError> {
    if caller == owner {
        Ok(())
    } else {
        Err(AuthorizationError::NotOwner)
    }
}
