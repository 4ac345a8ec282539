use crate::config::AdminConfig;
use crate::error::{AppError, AppResult};
use crate::models::{AdminLoginRequest, AdminLoginResponse};
use crate::utils::*;

#[derive(Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    admin_password: String,
}

impl AuthService {
    pub fn new(jwt_service: JwtService, admin: &AdminConfig) -> Self {
        Self {
            jwt_service,
            admin_password: admin.password.clone(),
        }
    }

    /// 主持人登录，成功后签发管理员令牌
    pub async fn admin_login(&self, request: AdminLoginRequest) -> AppResult<AdminLoginResponse> {
        if !verify_admin_password(&request.password, &self.admin_password)? {
            log::warn!("Admin login failed: wrong password");
            return Err(AppError::AuthError("密码错误".to_string()));
        }

        let access_token = self.jwt_service.generate_admin_token()?;
        log::info!("Admin logged in");

        Ok(AdminLoginResponse {
            access_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }
}
