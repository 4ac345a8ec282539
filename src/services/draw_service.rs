use crate::entities::{participant_entity as participants, prize_entity as prizes};
use crate::error::{AppError, AppResult};
use crate::models::{DrawStatusResponse, EligiblePoolResponse, ParticipantResponse, RoundRecordResponse};
use crate::services::draw_session::DrawSession;
use crate::services::{EligibilityTracker, RoundCommitter};
use rand::Rng;
use sea_orm::{DatabaseConnection, EntityTrait};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

/// 开奖控制台：按奖项维护内存中的开奖会话，停止时交给 [`RoundCommitter`] 写库。
///
/// 会话不落库，进程重启后全部回到 Idle，已提交的数据不受影响。
#[derive(Clone)]
pub struct DrawService {
    pool: DatabaseConnection,
    eligibility: EligibilityTracker,
    committer: RoundCommitter,
    sessions: Arc<Mutex<HashMap<i64, DrawSession>>>,
}

impl DrawService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self {
            committer: RoundCommitter::new(pool.clone()),
            eligibility: EligibilityTracker::new(),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            pool,
        }
    }

    /// 当前奖项的控制台状态
    pub async fn status(&self, prize_id: i64) -> AppResult<DrawStatusResponse> {
        let prize = self.load_prize(prize_id).await?;
        let eligible = self.eligibility.eligible_pool(&self.pool).await?;

        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .entry(prize_id)
            .or_insert_with(|| DrawSession::new(prize_id));
        session.refresh_bounds(&prize, eligible.len());
        Ok(build_status(session, &prize, eligible.len()))
    }

    /// 开始滚动 (`Idle -> Rolling`)
    pub async fn start_round(&self, prize_id: i64, is_extra: bool) -> AppResult<DrawStatusResponse> {
        let prize = self.load_prize(prize_id).await?;
        let eligible = self.eligibility.eligible_pool(&self.pool).await?;

        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .entry(prize_id)
            .or_insert_with(|| DrawSession::new(prize_id));
        session.start(&prize, eligible.len(), is_extra)?;

        log::info!(
            "Round started for prize {} (extra: {}, size: {}, max: {})",
            prize_id,
            is_extra,
            session.round_size(),
            session.max_draw_count()
        );
        Ok(build_status(session, &prize, eligible.len()))
    }

    pub async fn set_round_size(&self, prize_id: i64, round_size: i64) -> AppResult<DrawStatusResponse> {
        let prize = self.load_prize(prize_id).await?;
        let eligible_count = self.eligibility.eligible_pool(&self.pool).await?.len();

        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .entry(prize_id)
            .or_insert_with(|| DrawSession::new(prize_id));
        session.set_round_size(round_size)?;
        Ok(build_status(session, &prize, eligible_count))
    }

    /// 停止滚动、抽取中奖者并提交 (`Rolling -> Settled -> Idle`)
    ///
    /// 存储不可用时会话保持 Settled，再次调用会以相同的中奖者和 nonce 重试提交；
    /// 提交被拒绝时本轮作废，需要重新开始。
    pub async fn stop_round(&self, prize_id: i64) -> AppResult<RoundRecordResponse> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .entry(prize_id)
            .or_insert_with(|| DrawSession::new(prize_id));

        let settled = match session.settled_round() {
            Some(pending) => {
                log::info!("Retrying commit for prize {} with the settled winners", prize_id);
                pending
            }
            None => {
                let prize = self.load_prize(prize_id).await?;
                let eligible = self.eligibility.eligible_pool(&self.pool).await?;
                let settled = session.settle(&prize, eligible, &mut rand::thread_rng())?;
                log::info!(
                    "Round settled for prize {}: {} winner(s)",
                    prize_id,
                    settled.winners.len()
                );
                settled
            }
        };

        match self.committer.commit(&settled).await {
            Ok(record) => {
                session.complete();
                Ok(record)
            }
            Err(AppError::StorageUnavailable(e)) => {
                log::error!("Commit for prize {} failed, round kept for retry: {}", prize_id, e);
                Err(AppError::StorageUnavailable(e))
            }
            Err(e) => {
                session.complete();
                Err(e)
            }
        }
    }

    /// 放弃当前轮次（滚动中或待提交），不产生任何数据变化
    pub async fn cancel_round(&self, prize_id: i64) -> AppResult<DrawStatusResponse> {
        let prize = self.load_prize(prize_id).await?;
        let eligible_count = self.eligibility.eligible_pool(&self.pool).await?.len();

        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .entry(prize_id)
            .or_insert_with(|| DrawSession::new(prize_id));
        session.cancel()?;
        session.refresh_bounds(&prize, eligible_count);

        log::info!("Round cancelled for prize {}", prize_id);
        Ok(build_status(session, &prize, eligible_count))
    }

    /// 停止前取消补抽
    pub async fn cancel_extra_round(&self, prize_id: i64) -> AppResult<DrawStatusResponse> {
        let prize = self.load_prize(prize_id).await?;
        let eligible_count = self.eligibility.eligible_pool(&self.pool).await?.len();

        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .entry(prize_id)
            .or_insert_with(|| DrawSession::new(prize_id));
        session.cancel_extra(&prize, eligible_count)?;

        log::info!("Extra round cancelled for prize {}", prize_id);
        Ok(build_status(session, &prize, eligible_count))
    }

    /// 滚动展示用的随机参与者，奖池为空时返回 None
    pub async fn rolling_pick(&self, prize_id: i64) -> AppResult<Option<ParticipantResponse>> {
        self.load_prize(prize_id).await?;
        let mut eligible = self.eligibility.eligible_pool(&self.pool).await?;
        if eligible.is_empty() {
            return Ok(None);
        }
        let index = rand::thread_rng().gen_range(0..eligible.len());
        Ok(Some(eligible.swap_remove(index).into()))
    }

    pub async fn eligible_pool(&self) -> AppResult<EligiblePoolResponse> {
        let eligible = self.eligibility.eligible_pool(&self.pool).await?;
        Ok(EligiblePoolResponse {
            count: eligible.len(),
            participants: eligible.into_iter().map(Into::into).collect(),
        })
    }

    pub async fn winner_ids(&self) -> AppResult<HashSet<i64>> {
        self.eligibility.winner_ids(&self.pool).await
    }

    /// 重置后丢弃所有内存中的会话
    pub async fn clear_sessions(&self) {
        self.sessions.lock().await.clear();
    }

    async fn load_prize(&self, prize_id: i64) -> AppResult<prizes::Model> {
        prizes::Entity::find_by_id(prize_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Prize not found".into()))
    }
}

fn build_status(session: &DrawSession, prize: &prizes::Model, eligible_count: usize) -> DrawStatusResponse {
    DrawStatusResponse {
        prize_id: prize.id,
        phase: session.phase(),
        is_extra: session.is_extra(),
        round_size: session.round_size(),
        max_draw_count: session.max_draw_count(),
        remaining: prize.remaining,
        eligible_count,
        pending_winners: session
            .pending_winners()
            .iter()
            .cloned()
            .map(|p: participants::Model| p.into())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;
    use crate::entities::{draw_round_entity as draw_rounds, winner_link_entity as winner_links};
    use crate::models::DrawPhase;
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, PaginatorTrait, QueryFilter, Set};

    async fn seed_prize(pool: &DatabaseConnection, total: i64, round_limit: i64) -> prizes::Model {
        prizes::ActiveModel {
            name: Set("一等奖".into()),
            total_count: Set(total),
            remaining: Set(total),
            round_limit: Set(round_limit),
            image: Set(None),
            sort_order: Set(0),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(pool)
        .await
        .unwrap()
    }

    async fn seed_participants(pool: &DatabaseConnection, n: usize) {
        for i in 0..n {
            participants::ActiveModel {
                name: Set(format!("员工{i}")),
                employee_id: Set(format!("E{i:03}")),
                avatar_url: Set(None),
                registered_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(pool)
            .await
            .unwrap();
        }
    }

    async fn remaining(pool: &DatabaseConnection, prize_id: i64) -> i64 {
        prizes::Entity::find_by_id(prize_id)
            .one(pool)
            .await
            .unwrap()
            .unwrap()
            .remaining
    }

    #[tokio::test]
    async fn test_normal_round_then_extra_round() {
        let pool = test_pool().await;
        let service = DrawService::new(pool.clone());
        let prize = seed_prize(&pool, 3, 2).await;
        seed_participants(&pool, 5).await;

        let status = service.start_round(prize.id, false).await.unwrap();
        assert_eq!(status.phase, DrawPhase::Rolling);
        assert_eq!(status.round_size, 2);
        assert_eq!(status.max_draw_count, 3);

        service.set_round_size(prize.id, 2).await.unwrap();
        let record = service.stop_round(prize.id).await.unwrap();
        assert_eq!(record.winners.len(), 2);
        assert_ne!(record.winners[0].id, record.winners[1].id);
        assert_eq!(remaining(&pool, prize.id).await, 1);
        assert_eq!(service.eligible_pool().await.unwrap().count, 3);
        assert_eq!(service.status(prize.id).await.unwrap().phase, DrawPhase::Idle);

        // 把剩余名额抽完
        service.start_round(prize.id, false).await.unwrap();
        let status = service.status(prize.id).await.unwrap();
        assert_eq!(status.max_draw_count, 1);
        service.stop_round(prize.id).await.unwrap();
        assert_eq!(remaining(&pool, prize.id).await, 0);

        assert!(matches!(
            service.start_round(prize.id, false).await,
            Err(AppError::InvalidState(_))
        ));

        let status = service.start_round(prize.id, true).await.unwrap();
        assert!(status.is_extra);
        assert_eq!(status.max_draw_count, 2);
        service.set_round_size(prize.id, 1).await.unwrap();
        let record = service.stop_round(prize.id).await.unwrap();
        assert!(record.is_extra);
        assert_eq!(record.winners.len(), 1);
        assert_eq!(remaining(&pool, prize.id).await, -1);

        let links = winner_links::Entity::find().count(&pool).await.unwrap();
        assert_eq!(links, 4);
        assert_eq!(service.winner_ids().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_round_size_out_of_range() {
        let pool = test_pool().await;
        let service = DrawService::new(pool.clone());
        let prize = seed_prize(&pool, 3, 1).await;
        seed_participants(&pool, 2).await;

        assert!(matches!(
            service.set_round_size(prize.id, 1).await,
            Err(AppError::InvalidState(_))
        ));

        service.start_round(prize.id, false).await.unwrap();
        for bad in [0, 3] {
            assert!(matches!(
                service.set_round_size(prize.id, bad).await,
                Err(AppError::OutOfRange(_))
            ));
        }
        assert_eq!(
            service.set_round_size(prize.id, 2).await.unwrap().round_size,
            2
        );
    }

    #[tokio::test]
    async fn test_cancel_leaves_no_trace() {
        let pool = test_pool().await;
        let service = DrawService::new(pool.clone());
        let prize = seed_prize(&pool, 2, 1).await;
        seed_participants(&pool, 3).await;

        service.start_round(prize.id, false).await.unwrap();
        let status = service.cancel_round(prize.id).await.unwrap();
        assert_eq!(status.phase, DrawPhase::Idle);
        assert!(matches!(
            service.stop_round(prize.id).await,
            Err(AppError::InvalidState(_))
        ));
        assert_eq!(remaining(&pool, prize.id).await, 2);
        assert_eq!(draw_rounds::Entity::find().count(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cancel_extra_restores_normal_size() {
        let pool = test_pool().await;
        let service = DrawService::new(pool.clone());
        let prize = seed_prize(&pool, 2, 1).await;
        seed_participants(&pool, 4).await;

        assert!(matches!(
            service.cancel_extra_round(prize.id).await,
            Err(AppError::InvalidState(_))
        ));

        service.start_round(prize.id, true).await.unwrap();
        service.set_round_size(prize.id, 4).await.unwrap();
        let status = service.cancel_extra_round(prize.id).await.unwrap();
        assert_eq!(status.phase, DrawPhase::Idle);
        assert!(!status.is_extra);
        assert_eq!(status.round_size, 1);
        assert_eq!(status.max_draw_count, 2);
    }

    #[tokio::test]
    async fn test_stale_session_commit_is_rejected() {
        let pool = test_pool().await;
        let console_a = DrawService::new(pool.clone());
        let console_b = DrawService::new(pool.clone());
        let prize = seed_prize(&pool, 1, 1).await;
        seed_participants(&pool, 1).await;

        console_a.start_round(prize.id, false).await.unwrap();
        console_b.start_round(prize.id, false).await.unwrap();
        console_a.stop_round(prize.id).await.unwrap();

        // 另一个控制台抽到的是同一个人，提交时应被拒绝且会话回到 Idle
        let result = console_b.stop_round(prize.id).await;
        assert!(matches!(
            result,
            Err(AppError::InvalidState(_)) | Err(AppError::CommitRejected(_))
        ));
        assert_eq!(console_b.status(prize.id).await.unwrap().phase, DrawPhase::Idle);
        assert_eq!(remaining(&pool, prize.id).await, 0);
        assert_eq!(
            draw_rounds::Entity::find()
                .filter(draw_rounds::Column::PrizeId.eq(prize.id))
                .count(&pool)
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_storage_failure_keeps_settled_round_for_retry() {
        let pool = test_pool().await;
        let service = DrawService::new(pool.clone());
        let prize = seed_prize(&pool, 3, 2).await;
        seed_participants(&pool, 5).await;
        service.start_round(prize.id, false).await.unwrap();

        // 开奖记录表暂时不可用
        pool.execute_unprepared("ALTER TABLE draw_rounds RENAME TO draw_rounds_offline")
            .await
            .unwrap();
        let first = service.stop_round(prize.id).await;
        assert!(matches!(first, Err(AppError::StorageUnavailable(_))));
        pool.execute_unprepared("ALTER TABLE draw_rounds_offline RENAME TO draw_rounds")
            .await
            .unwrap();

        let status = service.status(prize.id).await.unwrap();
        assert_eq!(status.phase, DrawPhase::Settled);
        let pending: Vec<i64> = status.pending_winners.iter().map(|p| p.id).collect();
        assert_eq!(pending.len(), 2);
        assert_eq!(remaining(&pool, prize.id).await, 3);

        // 重试沿用同一批中奖者，只写入一次
        let record = service.stop_round(prize.id).await.unwrap();
        let committed: Vec<i64> = record.winners.iter().map(|p| p.id).collect();
        assert_eq!(committed, pending);
        assert_eq!(remaining(&pool, prize.id).await, 1);
        assert_eq!(draw_rounds::Entity::find().count(&pool).await.unwrap(), 1);
        assert_eq!(winner_links::Entity::find().count(&pool).await.unwrap(), 2);
        assert_eq!(service.status(prize.id).await.unwrap().phase, DrawPhase::Idle);
    }

    #[tokio::test]
    async fn test_rolling_pick_and_clear_sessions() {
        let pool = test_pool().await;
        let service = DrawService::new(pool.clone());
        let prize = seed_prize(&pool, 1, 1).await;
        assert!(service.rolling_pick(prize.id).await.unwrap().is_none());

        seed_participants(&pool, 2).await;
        assert!(service.rolling_pick(prize.id).await.unwrap().is_some());

        service.start_round(prize.id, false).await.unwrap();
        service.clear_sessions().await;
        assert_eq!(service.status(prize.id).await.unwrap().phase, DrawPhase::Idle);
    }

    #[tokio::test]
    async fn test_unknown_prize() {
        let pool = test_pool().await;
        let service = DrawService::new(pool.clone());
        seed_participants(&pool, 2).await;
        assert!(matches!(
            service.start_round(42, false).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.rolling_pick(42).await,
            Err(AppError::NotFound(_))
        ));
    }
}
