use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 中奖名单导出行（导出方依赖该结构，修改需同步迁移）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct WinnerExportRow {
    pub participant_name: String,
    pub employee_id: String,
    pub prize_name: String,
    pub drawn_at: DateTime<Utc>,
    pub is_extra: bool,
}
