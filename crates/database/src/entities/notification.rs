use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub kind: String,
    pub priority: String,
    pub target_audience: String,
    pub target_class_id: Option<Uuid>,
    pub attachments: Json,
    pub publish_date: DateTime,
    pub expiry_date: Option<DateTime>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class::Entity",
        from = "Column::TargetClassId",
        to = "super::class::Column::Id"
    )]
    TargetClass,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    Creator,
    #[sea_orm(has_many = "super::notification_read::Entity")]
    Reads,
}

impl Related<super::class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TargetClass.def()
    }
}

impl Related<super::notification_read::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reads.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
