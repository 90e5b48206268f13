use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::Role;

/// User entity - represents a user in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Profile fields supplied when creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub roles: Vec<Role>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(profile: NewUser, password_hash: String) -> Self {
        let now = Utc::now();
        let mut roles: Vec<Role> = Vec::with_capacity(profile.roles.len());
        for role in profile.roles {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        Self {
            id: Uuid::new_v4(),
            user_name: profile.user_name,
            email: profile.email,
            password_hash,
            first_name: profile.first_name,
            last_name: profile.last_name,
            phone_number: profile.phone_number,
            roles,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
