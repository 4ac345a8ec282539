use crate::models::*;
use crate::services::{DrawService, HistoryService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/draw-history",
    tag = "history",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "开奖历史，最新在前", body = [RoundRecordResponse]),
        (status = 401, description = "未授权")
    )
)]
pub async fn draw_history(service: web::Data<HistoryService>) -> Result<HttpResponse> {
    match service.list_history().await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/winner-ids",
    tag = "history",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "所有中奖者ID", body = [i64]),
        (status = 401, description = "未授权")
    )
)]
pub async fn winner_ids(service: web::Data<DrawService>) -> Result<HttpResponse> {
    match service.winner_ids().await {
        Ok(ids) => {
            let mut ids: Vec<i64> = ids.into_iter().collect();
            ids.sort_unstable();
            Ok(HttpResponse::Ok().json(json!({ "success": true, "data": ids })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/export",
    tag = "history",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "中奖名单导出行", body = [WinnerExportRow]),
        (status = 401, description = "未授权")
    )
)]
pub async fn export(service: web::Data<HistoryService>) -> Result<HttpResponse> {
    match service.export_rows().await {
        Ok(rows) => Ok(HttpResponse::Ok().json(ApiResponse::success(rows))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn history_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/draw-history", web::get().to(draw_history))
        .route("/winner-ids", web::get().to(winner_ids))
        .route("/export", web::get().to(export));
}
