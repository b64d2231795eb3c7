use super::role::{Role, Roles};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Имя пользователя в виде частей (таблица хранит составной тип `name_human`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameHuman {
    pub prefix: Option<String>,
    pub first: Option<String>,
    pub middle: Option<String>,
    pub last: Option<String>,
    pub suffix: Option<String>,
    pub complete: Option<String>,
}

impl NameHuman {
    /// Полное имя; если `complete` не задано, собирается из частей
    #[must_use]
    pub fn display(&self) -> String {
        if let Some(complete) = self.complete.as_deref().filter(|c| !c.is_empty()) {
            return complete.to_string();
        }
        [&self.prefix, &self.first, &self.middle, &self.last, &self.suffix]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Даты жизненного цикла учётной записи
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDates {
    pub created: Option<DateTime<Utc>>,
    pub changed: Option<DateTime<Utc>>,
    pub synced: Option<DateTime<Utc>>,
    pub locked: Option<DateTime<Utc>>,
    pub deleted: Option<DateTime<Utc>>,
}

/// Учётная запись сайта, загруженная из `v_users_self`
///
/// Снимок на время одного запроса, после загрузки не меняется.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub id_external: Option<i64>,
    pub name_machine: String,
    pub name_human: NameHuman,
    pub address_email: Option<String>,
    pub roles: Roles,
    pub is_private: bool,
    pub is_locked: bool,
    pub is_deleted: bool,
    pub is_roler: bool,
    pub dates: UserDates,
}

impl User {
    #[must_use]
    pub fn new(id: i64, name_machine: impl Into<String>) -> Self {
        Self {
            id,
            id_external: None,
            name_machine: name_machine.into(),
            name_human: NameHuman::default(),
            address_email: None,
            roles: Roles::new(),
            is_private: true,
            is_locked: false,
            is_deleted: false,
            is_roler: false,
            dates: UserDates::default(),
        }
    }

    #[must_use]
    pub fn with_roles(mut self, roles: &[Role]) -> Self {
        for role in roles {
            self.roles.add(*role);
        }
        self
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.has(role)
    }

    /// Управленческие страницы доступны менеджерам и администраторам
    #[must_use]
    pub fn is_manager(&self) -> bool {
        self.roles.has_any(&[Role::Manager, Role::Administer])
    }

    #[must_use]
    pub fn is_administer(&self) -> bool {
        self.roles.has(Role::Administer)
    }

    /// Имя для показа: человеческое, если задано, иначе машинное
    #[must_use]
    pub fn display_name(&self) -> String {
        let human = self.name_human.display();
        if human.is_empty() { self.name_machine.clone() } else { human }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback() {
        let mut user = User::new(1001, "jdoe");
        assert_eq!(user.display_name(), "jdoe");

        user.name_human.first = Some("Jane".to_string());
        user.name_human.last = Some("Doe".to_string());
        assert_eq!(user.display_name(), "Jane Doe");

        user.name_human.complete = Some("Dr. Jane Doe".to_string());
        assert_eq!(user.display_name(), "Dr. Jane Doe");
    }

    #[test]
    fn test_manager_roles() {
        let user = User::new(1001, "m").with_roles(&[Role::User, Role::Manager]);
        assert!(user.is_manager());
        assert!(!user.is_administer());

        let admin = User::new(1002, "a").with_roles(&[Role::Administer]);
        assert!(admin.is_manager());
        assert!(admin.is_administer());
    }
}
