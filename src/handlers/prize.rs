use crate::models::*;
use crate::services::PrizeService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/prizes",
    tag = "prizes",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "奖项列表", body = [PrizeResponse]),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_prizes(service: web::Data<PrizeService>) -> Result<HttpResponse> {
    match service.list_prizes().await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/prizes",
    tag = "prizes",
    request_body = CreatePrizeRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "创建成功", body = PrizeResponse),
        (status = 400, description = "参数错误或奖项数量已达上限"),
        (status = 401, description = "未授权")
    )
)]
pub async fn create_prize(
    service: web::Data<PrizeService>,
    request: web::Json<CreatePrizeRequest>,
) -> Result<HttpResponse> {
    match service.create_prize(request.into_inner()).await {
        Ok(prize) => Ok(HttpResponse::Ok().json(ApiResponse::success(prize))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/prizes/{prize_id}",
    tag = "prizes",
    params(
        ("prize_id" = i64, Path, description = "奖项ID")
    ),
    request_body = UpdatePrizeRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "修改成功", body = PrizeResponse),
        (status = 400, description = "参数错误"),
        (status = 404, description = "奖项不存在")
    )
)]
/// 修改奖项；剩余名额随总数差值同步调整
pub async fn update_prize(
    service: web::Data<PrizeService>,
    path: web::Path<i64>,
    request: web::Json<UpdatePrizeRequest>,
) -> Result<HttpResponse> {
    match service.update_prize(path.into_inner(), request.into_inner()).await {
        Ok(prize) => Ok(HttpResponse::Ok().json(ApiResponse::success(prize))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn prize_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/prizes")
            .route("", web::get().to(list_prizes))
            .route("", web::post().to(create_prize))
            .route("/{prize_id}", web::put().to(update_prize)),
    );
}
