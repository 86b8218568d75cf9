// src/models/rbac.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// O que sai do banco (Tabela roles)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: i32,
    pub name: String,
}

/// Os papéis semeados pela migração. O id é o que viaja no JWT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleKind {
    Admin,
    Client,
    Manager,
}

impl RoleKind {
    pub const fn id(self) -> i32 {
        match self {
            RoleKind::Admin => 1,
            RoleKind::Client => 2,
            RoleKind::Manager => 3,
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(RoleKind::Admin),
            2 => Some(RoleKind::Client),
            3 => Some(RoleKind::Manager),
            _ => None,
        }
    }

    /// Quem pode entrar no painel administrativo.
    pub fn is_staff(self) -> bool {
        matches!(self, RoleKind::Admin | RoleKind::Manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for kind in [RoleKind::Admin, RoleKind::Client, RoleKind::Manager] {
            assert_eq!(RoleKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(RoleKind::from_id(99), None);
    }

    #[test]
    fn clients_are_not_staff() {
        assert!(RoleKind::Admin.is_staff());
        assert!(RoleKind::Manager.is_staff());
        assert!(!RoleKind::Client.is_staff());
    }
}
