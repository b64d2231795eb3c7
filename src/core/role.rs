use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Роль пользователя сайта
///
/// Порядок совпадает с числовыми идентификаторами ролей в базе данных,
/// роли старше `User` соответствуют колонкам `is_*` представления `v_users_self`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Public,
    System,
    User,
    Requester,
    Drafter,
    Editor,
    Reviewer,
    Financer,
    Insurer,
    Publisher,
    Auditor,
    Manager,
    Administer,
}

impl Role {
    pub const ALL: [Self; 13] = [
        Self::Public,
        Self::System,
        Self::User,
        Self::Requester,
        Self::Drafter,
        Self::Editor,
        Self::Reviewer,
        Self::Financer,
        Self::Insurer,
        Self::Publisher,
        Self::Auditor,
        Self::Manager,
        Self::Administer,
    ];

    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Public => 1,
            Self::System => 2,
            Self::User => 3,
            Self::Requester => 4,
            Self::Drafter => 5,
            Self::Editor => 6,
            Self::Reviewer => 7,
            Self::Financer => 8,
            Self::Insurer => 9,
            Self::Publisher => 10,
            Self::Auditor => 11,
            Self::Manager => 12,
            Self::Administer => 13,
        }
    }

    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.id() == id)
    }

    /// Имя колонки в `v_users_self`; у `User` колонки нет, её имеют все вошедшие
    #[must_use]
    pub const fn column(self) -> Option<&'static str> {
        match self {
            Self::Public => Some("is_public"),
            Self::System => Some("is_system"),
            Self::User => None,
            Self::Requester => Some("is_requester"),
            Self::Drafter => Some("is_drafter"),
            Self::Editor => Some("is_editor"),
            Self::Reviewer => Some("is_reviewer"),
            Self::Financer => Some("is_financer"),
            Self::Insurer => Some("is_insurer"),
            Self::Publisher => Some("is_publisher"),
            Self::Auditor => Some("is_auditor"),
            Self::Manager => Some("is_manager"),
            Self::Administer => Some("is_administer"),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::System => "system",
            Self::User => "user",
            Self::Requester => "requester",
            Self::Drafter => "drafter",
            Self::Editor => "editor",
            Self::Reviewer => "reviewer",
            Self::Financer => "financer",
            Self::Insurer => "insurer",
            Self::Publisher => "publisher",
            Self::Auditor => "auditor",
            Self::Manager => "manager",
            Self::Administer => "administer",
        }
    }
}

/// Набор ролей пользователя
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roles {
    roles: BTreeSet<Role>,
}

impl Roles {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, role: Role) {
        self.roles.insert(role);
    }

    pub fn remove(&mut self, role: Role) {
        self.roles.remove(&role);
    }

    #[must_use]
    pub fn has(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Есть ли хотя бы одна из перечисленных ролей
    #[must_use]
    pub fn has_any(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.has(*role))
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.iter().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl FromIterator<Role> for Roles {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self { roles: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ids_roundtrip() {
        for role in Role::ALL {
            assert_eq!(Role::from_id(role.id()), Some(role));
        }
        assert_eq!(Role::from_id(0), None);
        assert_eq!(Role::from_id(14), None);
    }

    #[test]
    fn test_roles_set() {
        let mut roles: Roles = [Role::Public, Role::User].into_iter().collect();
        assert!(roles.has(Role::User));
        assert!(!roles.has_any(&[Role::Manager, Role::Administer]));

        roles.add(Role::Manager);
        assert!(roles.has_any(&[Role::Manager, Role::Administer]));

        roles.remove(Role::Public);
        assert_eq!(roles.iter().collect::<Vec<_>>(), vec![Role::User, Role::Manager]);
    }

    #[test]
    fn test_user_has_no_column() {
        assert_eq!(Role::User.column(), None);
        assert_eq!(Role::Administer.column(), Some("is_administer"));
    }
}
