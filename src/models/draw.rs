use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ParticipantResponse;

/// 开奖会话阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DrawPhase {
    /// 空闲，没有进行中的轮次
    Idle,
    /// 滚动展示中，尚未确定中奖者
    Rolling,
    /// 中奖者已确定，等待写库
    Settled,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct StartRoundRequest {
    /// 是否补抽 (不受剩余名额限制)
    #[serde(default)]
    pub is_extra: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetRoundSizeRequest {
    #[schema(example = 2)]
    pub round_size: i64,
}

/// 开奖控制台状态
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DrawStatusResponse {
    pub prize_id: i64,
    pub phase: DrawPhase,
    pub is_extra: bool,
    /// 本轮抽取人数
    pub round_size: i64,
    /// 本轮可选的最大人数
    pub max_draw_count: i64,
    pub remaining: i64,
    pub eligible_count: usize,
    /// 已确定但尚未写库的中奖者 (仅 settled 阶段)
    pub pending_winners: Vec<ParticipantResponse>,
}

/// 一轮开奖记录及其中奖者
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoundRecordResponse {
    pub id: i64,
    pub prize_id: i64,
    /// 奖项名称 (开奖时快照)
    pub prize_name: String,
    pub is_extra: bool,
    pub drawn_at: DateTime<Utc>,
    pub winners: Vec<ParticipantResponse>,
}
