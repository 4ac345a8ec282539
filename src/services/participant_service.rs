use crate::config::LotteryConfig;
use crate::entities::participant_entity as participants;
use crate::error::{AppError, AppResult};
use crate::models::{ParticipantResponse, RegisterParticipantRequest};
use crate::services::EligibilityTracker;
use crate::utils::default_avatar_url;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

#[derive(Clone)]
pub struct ParticipantService {
    pool: DatabaseConnection,
    eligibility: EligibilityTracker,
    avatar_base: String,
}

impl ParticipantService {
    pub fn new(pool: DatabaseConnection, config: &LotteryConfig) -> Self {
        Self {
            pool,
            eligibility: EligibilityTracker::new(),
            avatar_base: config.default_avatar_base.clone(),
        }
    }

    /// 报名；同名同工号重复报名时直接返回已有记录
    pub async fn register(
        &self,
        request: RegisterParticipantRequest,
    ) -> AppResult<ParticipantResponse> {
        let name = request.name.trim();
        let employee_id = request.employee_id.trim();
        if name.is_empty() || employee_id.is_empty() {
            return Err(AppError::ValidationError(
                "Name and employee id are required".into(),
            ));
        }

        if let Some(existing) = participants::Entity::find()
            .filter(participants::Column::Name.eq(name))
            .filter(participants::Column::EmployeeId.eq(employee_id))
            .one(&self.pool)
            .await?
        {
            return Ok(existing.into());
        }

        let avatar_url = request
            .avatar_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| default_avatar_url(&self.avatar_base, name));

        let created = participants::ActiveModel {
            name: Set(name.to_string()),
            employee_id: Set(employee_id.to_string()),
            avatar_url: Set(Some(avatar_url)),
            registered_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Participant {} registered", created.id);
        Ok(created.into())
    }

    /// 全部报名者（最新在前）
    pub async fn list(&self) -> AppResult<Vec<ParticipantResponse>> {
        let list = self.eligibility.list_participants(&self.pool).await?;
        Ok(list.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;

    fn request(name: &str, employee_id: &str) -> RegisterParticipantRequest {
        RegisterParticipantRequest {
            name: name.into(),
            employee_id: employee_id.into(),
            avatar_url: None,
        }
    }

    #[tokio::test]
    async fn test_register_is_idempotent_per_name_and_employee_id() {
        let service = ParticipantService::new(test_pool().await, &LotteryConfig::default());

        let first = service.register(request(" 张三 ", "E001")).await.unwrap();
        assert_eq!(first.name, "张三");
        assert!(first.avatar_url.as_deref().unwrap().contains("seed="));

        let again = service.register(request("张三", "E001")).await.unwrap();
        assert_eq!(again, first);

        // 同名不同工号视为不同的人
        let other = service.register(request("张三", "E002")).await.unwrap();
        assert_ne!(other.id, first.id);
        assert_eq!(service.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_register_requires_name_and_employee_id() {
        let service = ParticipantService::new(test_pool().await, &LotteryConfig::default());
        assert!(matches!(
            service.register(request("", "E001")).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            service.register(request("李四", "  ")).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_register_keeps_custom_avatar() {
        let service = ParticipantService::new(test_pool().await, &LotteryConfig::default());
        let created = service
            .register(RegisterParticipantRequest {
                name: "王五".into(),
                employee_id: "E003".into(),
                avatar_url: Some("data:image/png;base64,AAAA".into()),
            })
            .await
            .unwrap();
        assert_eq!(created.avatar_url.as_deref(), Some("data:image/png;base64,AAAA"));
    }
}
