use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 奖项配置实体
/// 概念说明:
/// - total_count: 奖项总名额
/// - remaining: 剩余名额，开奖只通过 RoundCommitter 扣减；补抽允许其变为负数
/// - round_limit: 单轮默认抽取人数
/// - sort_order: 展示顺序 (唯一)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "prizes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub total_count: i64,
    pub remaining: i64,
    pub round_limit: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub image: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn is_exhausted(&self) -> bool {
        self.remaining <= 0
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
