use crate::models::*;
use crate::services::{DrawService, ParticipantService};
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/participants",
    tag = "participants",
    request_body = RegisterParticipantRequest,
    responses(
        (status = 200, description = "报名成功（重复报名返回已有记录）", body = ParticipantResponse),
        (status = 400, description = "姓名或工号为空")
    )
)]
/// 扫码报名，无需登录
pub async fn register(
    service: web::Data<ParticipantService>,
    request: web::Json<RegisterParticipantRequest>,
) -> Result<HttpResponse> {
    match service.register(request.into_inner()).await {
        Ok(participant) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            participant,
            "报名成功",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/participants",
    tag = "participants",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "全部报名者，最新在前", body = [ParticipantResponse]),
        (status = 401, description = "未授权")
    )
)]
pub async fn list(service: web::Data<ParticipantService>) -> Result<HttpResponse> {
    match service.list().await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/eligible",
    tag = "participants",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "当前奖池（未中奖的报名者）", body = EligiblePoolResponse),
        (status = 401, description = "未授权")
    )
)]
pub async fn eligible(service: web::Data<DrawService>) -> Result<HttpResponse> {
    match service.eligible_pool().await {
        Ok(pool) => Ok(HttpResponse::Ok().json(ApiResponse::success(pool))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn participant_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/participants")
            .route("", web::post().to(register))
            .route("", web::get().to(list)),
    )
    .route("/eligible", web::get().to(eligible));
}
