use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::participant_entity;

/// 报名请求
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterParticipantRequest {
    #[schema(example = "张三")]
    pub name: String,
    /// 工号
    #[schema(example = "E1024")]
    pub employee_id: String,
    /// 自定义头像 (URL 或 data URI)，为空时生成首字母头像
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ParticipantResponse {
    pub id: i64,
    pub name: String,
    pub employee_id: String,
    pub avatar_url: Option<String>,
    pub registered_at: DateTime<Utc>,
}

impl From<participant_entity::Model> for ParticipantResponse {
    fn from(m: participant_entity::Model) -> Self {
        ParticipantResponse {
            id: m.id,
            name: m.name,
            employee_id: m.employee_id,
            avatar_url: m.avatar_url,
            registered_at: m.registered_at,
        }
    }
}

/// 当前奖池（从未中奖的参与者）
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EligiblePoolResponse {
    pub count: usize,
    pub participants: Vec<ParticipantResponse>,
}
