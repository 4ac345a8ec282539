use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::participant::register,
        handlers::participant::list,
        handlers::participant::eligible,
        handlers::prize::list_prizes,
        handlers::prize::create_prize,
        handlers::prize::update_prize,
        handlers::draw::get_status,
        handlers::draw::start_round,
        handlers::draw::set_round_size,
        handlers::draw::stop_round,
        handlers::draw::cancel_round,
        handlers::draw::cancel_extra_round,
        handlers::draw::rolling,
        handlers::history::draw_history,
        handlers::history::winner_ids,
        handlers::history::export,
        handlers::reset::full_reset,
        handlers::reset::reset_lottery,
    ),
    components(
        schemas(
            AdminLoginRequest,
            AdminLoginResponse,
            RegisterParticipantRequest,
            ParticipantResponse,
            EligiblePoolResponse,
            CreatePrizeRequest,
            UpdatePrizeRequest,
            PrizeResponse,
            DrawPhase,
            StartRoundRequest,
            SetRoundSizeRequest,
            DrawStatusResponse,
            RoundRecordResponse,
            WinnerExportRow,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Operator login"),
        (name = "participants", description = "Registration and eligible pool"),
        (name = "prizes", description = "Prize tiers"),
        (name = "draw", description = "Draw console"),
        (name = "history", description = "Draw history and export"),
        (name = "reset", description = "Full and lottery-only reset"),
    ),
    info(
        title = "Lottery Backend API",
        version = "1.0.0",
        description = "Presenter-driven prize draw REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
