use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::prize_entity;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePrizeRequest {
    #[schema(example = "一等奖")]
    pub name: String,
    /// 总名额
    #[schema(example = 3)]
    pub count: i64,
    /// 单轮抽取人数 (默认 1)
    #[schema(example = 2)]
    pub round_limit: Option<i64>,
    pub image: Option<String>,
}

/// 修改奖项；remaining 不可直接修改，调整 count 时按差值同步
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdatePrizeRequest {
    pub name: Option<String>,
    pub count: Option<i64>,
    pub round_limit: Option<i64>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrizeResponse {
    pub id: i64,
    pub name: String,
    pub total_count: i64,
    /// 剩余名额 (补抽后可能为负)
    pub remaining: i64,
    pub round_limit: i64,
    pub image: Option<String>,
    pub sort_order: i32,
}

impl From<prize_entity::Model> for PrizeResponse {
    fn from(m: prize_entity::Model) -> Self {
        PrizeResponse {
            id: m.id,
            name: m.name,
            total_count: m.total_count,
            remaining: m.remaining,
            round_limit: m.round_limit,
            image: m.image,
            sort_order: m.sort_order,
        }
    }
}
