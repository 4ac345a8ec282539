use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 开奖记录实体
/// 说明:
/// - 每提交一轮开奖产生一条记录，写入后不再更新
/// - prize_name 冗余存储 (奖项后续改名仍可回溯)
/// - round_nonce 为开奖轮次的唯一标识，用于识别重复提交
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "draw_rounds")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub prize_id: i64,
    /// 奖项名称 (历史快照)
    pub prize_name: String,
    pub round_nonce: String,
    /// 是否为补抽
    pub is_extra: bool,
    pub drawn_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
