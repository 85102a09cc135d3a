use serde::{Deserialize, Serialize};

use dashgate_core::{DomainError, Entity, EntityKind};

use crate::{Role, RoleBinding, User};

/// Tagged entity accepted at the service boundary.
///
/// Deserialization fails on an unknown `kind`, so the transport layer rejects
/// it before any service is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum AnyEntity {
    Role(Role),
    RoleBinding(RoleBinding),
    User(User),
}

impl AnyEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            AnyEntity::Role(_) => EntityKind::Role,
            AnyEntity::RoleBinding(_) => EntityKind::RoleBinding,
            AnyEntity::User(_) => EntityKind::User,
        }
    }

    /// Unwrap the variant expected by a typed service.
    pub fn expect<E>(self) -> Result<E, DomainError>
    where
        E: Entity + TryFrom<AnyEntity, Error = DomainError>,
    {
        E::try_from(self)
    }
}

fn wrong_format(expected: EntityKind, actual: EntityKind) -> DomainError {
    DomainError::bad_request(format!(
        "wrong entity format, attempting {expected} format, received '{actual}'"
    ))
}

macro_rules! impl_entity_variant {
    ($t:ident) => {
        impl TryFrom<AnyEntity> for $t {
            type Error = DomainError;

            fn try_from(value: AnyEntity) -> Result<Self, Self::Error> {
                match value {
                    AnyEntity::$t(inner) => Ok(inner),
                    other => Err(wrong_format(<$t as Entity>::KIND, other.kind())),
                }
            }
        }

        impl From<$t> for AnyEntity {
            fn from(value: $t) -> Self {
                AnyEntity::$t(value)
            }
        }
    };
}

impl_entity_variant!(Role);
impl_entity_variant!(RoleBinding);
impl_entity_variant!(User);
