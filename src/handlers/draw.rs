use crate::models::*;
use crate::services::DrawService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/draw/{prize_id}",
    tag = "draw",
    params(
        ("prize_id" = i64, Path, description = "奖项ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "控制台状态", body = DrawStatusResponse),
        (status = 404, description = "奖项不存在")
    )
)]
pub async fn get_status(
    service: web::Data<DrawService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.status(path.into_inner()).await {
        Ok(status) => Ok(HttpResponse::Ok().json(ApiResponse::success(status))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/draw/{prize_id}/start",
    tag = "draw",
    params(
        ("prize_id" = i64, Path, description = "奖项ID")
    ),
    request_body = StartRoundRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "开始滚动", body = DrawStatusResponse),
        (status = 409, description = "已有进行中的轮次、奖池为空或名额已用完")
    )
)]
/// 开始一轮抽奖；名额用完后只能以补抽方式开始
pub async fn start_round(
    service: web::Data<DrawService>,
    path: web::Path<i64>,
    request: Option<web::Json<StartRoundRequest>>,
) -> Result<HttpResponse> {
    let is_extra = request.map(|r| r.is_extra).unwrap_or(false);
    match service.start_round(path.into_inner(), is_extra).await {
        Ok(status) => Ok(HttpResponse::Ok().json(ApiResponse::success(status))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/draw/{prize_id}/size",
    tag = "draw",
    params(
        ("prize_id" = i64, Path, description = "奖项ID")
    ),
    request_body = SetRoundSizeRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "修改成功", body = DrawStatusResponse),
        (status = 400, description = "人数超出范围"),
        (status = 409, description = "当前没有滚动中的轮次")
    )
)]
pub async fn set_round_size(
    service: web::Data<DrawService>,
    path: web::Path<i64>,
    request: web::Json<SetRoundSizeRequest>,
) -> Result<HttpResponse> {
    match service
        .set_round_size(path.into_inner(), request.round_size)
        .await
    {
        Ok(status) => Ok(HttpResponse::Ok().json(ApiResponse::success(status))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/draw/{prize_id}/stop",
    tag = "draw",
    params(
        ("prize_id" = i64, Path, description = "奖项ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "开奖成功", body = RoundRecordResponse),
        (status = 409, description = "没有滚动中的轮次或提交被拒绝"),
        (status = 503, description = "数据库不可用，可直接重试")
    )
)]
/// 停止滚动并开奖:
/// 1. 从奖池中无放回抽取中奖者
/// 2. 事务内写入开奖记录与中奖关联并扣减名额
/// 3. 数据库不可用时保留本轮结果，重试不会重新抽取
pub async fn stop_round(
    service: web::Data<DrawService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.stop_round(path.into_inner()).await {
        Ok(record) => Ok(HttpResponse::Ok().json(ApiResponse::success(record))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/draw/{prize_id}/cancel",
    tag = "draw",
    params(
        ("prize_id" = i64, Path, description = "奖项ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "已取消", body = DrawStatusResponse),
        (status = 409, description = "没有可取消的轮次")
    )
)]
pub async fn cancel_round(
    service: web::Data<DrawService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.cancel_round(path.into_inner()).await {
        Ok(status) => Ok(HttpResponse::Ok().json(ApiResponse::success(status))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/draw/{prize_id}/cancel-extra",
    tag = "draw",
    params(
        ("prize_id" = i64, Path, description = "奖项ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "已取消补抽，人数恢复默认值", body = DrawStatusResponse),
        (status = 409, description = "没有进行中的补抽")
    )
)]
pub async fn cancel_extra_round(
    service: web::Data<DrawService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.cancel_extra_round(path.into_inner()).await {
        Ok(status) => Ok(HttpResponse::Ok().json(ApiResponse::success(status))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/draw/{prize_id}/rolling",
    tag = "draw",
    params(
        ("prize_id" = i64, Path, description = "奖项ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "随机一位可抽奖的报名者，奖池为空时为 null", body = ParticipantResponse),
        (status = 404, description = "奖项不存在")
    )
)]
/// 滚动展示用，不影响开奖结果
pub async fn rolling(
    service: web::Data<DrawService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.rolling_pick(path.into_inner()).await {
        Ok(pick) => Ok(HttpResponse::Ok().json(ApiResponse {
            success: true,
            data: pick,
            message: None,
            error: None,
        })),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn draw_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/draw/{prize_id}")
            .route("", web::get().to(get_status))
            .route("/start", web::post().to(start_round))
            .route("/size", web::put().to(set_round_size))
            .route("/stop", web::post().to(stop_round))
            .route("/cancel", web::post().to(cancel_round))
            .route("/cancel-extra", web::post().to(cancel_extra_round))
            .route("/rolling", web::get().to(rolling)),
    );
}
