use crate::config::LotteryConfig;
use crate::entities::{
    draw_round_entity as draw_rounds, prize_entity as prizes, winner_link_entity as winner_links,
};
use crate::error::{AppError, AppResult};
use crate::models::{CreatePrizeRequest, PrizeResponse, UpdatePrizeRequest};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
    TransactionTrait,
};

#[derive(Clone)]
pub struct PrizeService {
    pool: DatabaseConnection,
    max_prizes: u64,
}

impl PrizeService {
    pub fn new(pool: DatabaseConnection, config: &LotteryConfig) -> Self {
        Self {
            pool,
            max_prizes: config.max_prizes,
        }
    }

    /// 奖项列表（按展示顺序）
    pub async fn list_prizes(&self) -> AppResult<Vec<PrizeResponse>> {
        let list = prizes::Entity::find()
            .order_by_asc(prizes::Column::SortOrder)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn get_prize(&self, prize_id: i64) -> AppResult<prizes::Model> {
        prizes::Entity::find_by_id(prize_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Prize not found".into()))
    }

    /// 新增奖项，remaining 初始等于总数，排在现有奖项之后
    pub async fn create_prize(&self, request: CreatePrizeRequest) -> AppResult<PrizeResponse> {
        let name = validate_name(&request.name)?;
        validate_count(request.count)?;
        let round_limit = request.round_limit.unwrap_or(1);
        validate_round_limit(round_limit)?;

        let txn = self.pool.begin().await?;
        let existing = prizes::Entity::find().count(&txn).await?;
        if existing >= self.max_prizes {
            return Err(AppError::ValidationError(format!(
                "At most {} prizes can be configured",
                self.max_prizes
            )));
        }

        let now = Utc::now();
        let created = prizes::ActiveModel {
            name: Set(name),
            total_count: Set(request.count),
            remaining: Set(request.count),
            round_limit: Set(round_limit),
            image: Set(request.image.filter(|s| !s.is_empty())),
            sort_order: Set(existing as i32),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(sort_order_conflict)?;
        txn.commit().await?;

        log::info!("Prize {} created with {} award(s)", created.id, created.total_count);
        Ok(created.into())
    }

    /// 修改奖项配置。remaining 不能直接写，修改总数时按差值同步，
    /// 且总数不能低于普通轮次已抽出的人数（补抽不计入）。
    pub async fn update_prize(
        &self,
        prize_id: i64,
        request: UpdatePrizeRequest,
    ) -> AppResult<PrizeResponse> {
        let txn = self.pool.begin().await?;
        let prize = prizes::Entity::find_by_id(prize_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Prize not found".into()))?;

        let total_count = prize.total_count;
        let remaining = prize.remaining;
        let mut model = prize.into_active_model();

        if let Some(name) = &request.name {
            model.name = Set(validate_name(name)?);
        }
        if let Some(round_limit) = request.round_limit {
            validate_round_limit(round_limit)?;
            model.round_limit = Set(round_limit);
        }
        if let Some(count) = request.count {
            validate_count(count)?;
            let drawn = normal_winner_count(&txn, prize_id).await?;
            if count < drawn {
                return Err(AppError::ValidationError(format!(
                    "Count cannot be lower than the {drawn} award(s) already drawn"
                )));
            }
            model.total_count = Set(count);
            model.remaining = Set(remaining + (count - total_count));
        }
        if let Some(image) = request.image {
            model.image = Set(Some(image).filter(|s| !s.is_empty()));
        }
        model.updated_at = Set(Utc::now());

        let updated = model.update(&txn).await?;
        txn.commit().await?;
        Ok(updated.into())
    }
}

/// 普通轮次（非补抽）已抽出的中奖人数
async fn normal_winner_count<C>(conn: &C, prize_id: i64) -> AppResult<i64>
where
    C: ConnectionTrait,
{
    let round_ids: Vec<i64> = draw_rounds::Entity::find()
        .select_only()
        .column(draw_rounds::Column::Id)
        .filter(draw_rounds::Column::PrizeId.eq(prize_id))
        .filter(draw_rounds::Column::IsExtra.eq(false))
        .into_tuple()
        .all(conn)
        .await?;
    if round_ids.is_empty() {
        return Ok(0);
    }
    let count = winner_links::Entity::find()
        .filter(winner_links::Column::RoundId.is_in(round_ids))
        .count(conn)
        .await?;
    Ok(count as i64)
}

// 并发新增时 sort_order 唯一索引冲突，提示重试而不是当作存储故障
fn sort_order_conflict(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::ValidationError(
            "Another prize was added at the same time, please retry".into(),
        ),
        _ => AppError::StorageUnavailable(err),
    }
}

fn validate_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::ValidationError("Prize name is required".into()));
    }
    Ok(name.to_string())
}

fn validate_count(count: i64) -> AppResult<()> {
    if count < 1 {
        return Err(AppError::ValidationError(
            "Prize count must be positive".into(),
        ));
    }
    Ok(())
}

fn validate_round_limit(round_limit: i64) -> AppResult<()> {
    if round_limit < 1 {
        return Err(AppError::ValidationError(
            "Round limit must be at least 1".into(),
        ));
    }
    Ok(())
}
