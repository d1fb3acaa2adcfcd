//! SeaORM entity for the accounts table.

use sea_orm::entity::prelude::*;

use crate::domain::{Account, Role, UserType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub nickname: String,
    pub password_hash: String,
    pub role: String,
    pub user_type: String,
    pub verification_token: Option<String>,
    pub email_verified: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            nickname: model.nickname,
            password_hash: model.password_hash,
            role: Role::from(model.role.as_str()),
            user_type: UserType::from(model.user_type.as_str()),
            verification_token: model.verification_token,
            email_verified: model.email_verified,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
