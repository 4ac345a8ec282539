use crate::services::{DrawService, ResetService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/reset",
    tag = "reset",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "已清空报名、奖项与开奖记录"),
        (status = 401, description = "未授权")
    )
)]
/// 全量重置，同时丢弃所有进行中的轮次
pub async fn full_reset(
    reset_service: web::Data<ResetService>,
    draw_service: web::Data<DrawService>,
) -> Result<HttpResponse> {
    match reset_service.full_reset().await {
        Ok(()) => {
            draw_service.clear_sessions().await;
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "message": "已全部重置"
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/reset/lottery",
    tag = "reset",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "已清空开奖记录并恢复名额"),
        (status = 401, description = "未授权")
    )
)]
/// 仅重置开奖结果，保留奖项与报名
pub async fn reset_lottery(
    reset_service: web::Data<ResetService>,
    draw_service: web::Data<DrawService>,
) -> Result<HttpResponse> {
    match reset_service.reset_lottery().await {
        Ok(()) => {
            draw_service.clear_sessions().await;
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "message": "开奖结果已重置"
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn reset_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reset")
            .route("", web::post().to(full_reset))
            .route("/lottery", web::post().to(reset_lottery)),
    );
}
