use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 中奖关联：一轮开奖中的一位中奖者
/// participant_id 全局唯一（同一个人只能中奖一次）
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "winner_links")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub round_id: i64,
    pub participant_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
