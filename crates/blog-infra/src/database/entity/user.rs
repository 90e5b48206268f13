//! User entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use blog_core::domain::{self, Role};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    /// JSON array of role names.
    pub roles: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub last_login_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Posts,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Roles that fail to decode are dropped, so a corrupted column can only
/// reduce a user's privileges.
fn decode_roles(user_id: Uuid, value: Json) -> Vec<Role> {
    match serde_json::from_value::<Vec<Role>>(value) {
        Ok(roles) => roles,
        Err(e) => {
            tracing::warn!(user_id = %user_id, error = %e, "Stored roles could not be decoded");
            Vec::new()
        }
    }
}

/// Conversion from SeaORM Model to Domain User.
impl From<Model> for domain::User {
    fn from(model: Model) -> Self {
        Self {
            roles: decode_roles(model.id, model.roles),
            id: model.id,
            user_name: model.user_name,
            email: model.email,
            password_hash: model.password_hash,
            first_name: model.first_name,
            last_name: model.last_name,
            phone_number: model.phone_number,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
            last_login_at: model.last_login_at.map(Into::into),
        }
    }
}

/// Conversion from Domain User to SeaORM ActiveModel.
impl From<domain::User> for ActiveModel {
    fn from(user: domain::User) -> Self {
        let roles: Vec<&str> = user.roles.iter().map(Role::as_str).collect();
        Self {
            id: Set(user.id),
            user_name: Set(user.user_name),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            phone_number: Set(user.phone_number),
            roles: Set(serde_json::json!(roles)),
            created_at: Set(user.created_at.into()),
            updated_at: Set(user.updated_at.into()),
            last_login_at: Set(user.last_login_at.map(Into::into)),
        }
    }
}
