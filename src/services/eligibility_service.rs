use crate::entities::{participant_entity as participants, winner_link_entity as winner_links};
use crate::error::AppResult;
use sea_orm::{ConnectionTrait, EntityTrait, QueryOrder, QuerySelect};
use std::collections::HashSet;

/// 奖池计算：所有参与者减去历史上任意一轮的中奖者（不区分奖项）
///
/// 纯读取投影，不做缓存；每次提交后都需要重新计算。
/// 读取中奖名单失败时直接返回错误，不能当作空集合处理。
#[derive(Clone, Default)]
pub struct EligibilityTracker;

impl EligibilityTracker {
    pub fn new() -> Self {
        Self
    }

    /// 所有中奖者 ID（去重）
    pub async fn winner_ids<C>(&self, conn: &C) -> AppResult<HashSet<i64>>
    where
        C: ConnectionTrait,
    {
        let ids: Vec<i64> = winner_links::Entity::find()
            .select_only()
            .column(winner_links::Column::ParticipantId)
            .distinct()
            .into_tuple()
            .all(conn)
            .await?;
        Ok(ids.into_iter().collect())
    }

    /// 全部参与者，按报名时间倒序
    pub async fn list_participants<C>(&self, conn: &C) -> AppResult<Vec<participants::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(participants::Entity::find()
            .order_by_desc(participants::Column::RegisteredAt)
            .order_by_desc(participants::Column::Id)
            .all(conn)
            .await?)
    }

    /// 当前奖池
    pub async fn eligible_pool<C>(&self, conn: &C) -> AppResult<Vec<participants::Model>>
    where
        C: ConnectionTrait,
    {
        let all = self.list_participants(conn).await?;
        let winners = self.winner_ids(conn).await?;
        Ok(exclude_winners(all, &winners))
    }
}

/// `all - winners`，保持原有顺序
pub fn exclude_winners(
    all: Vec<participants::Model>,
    winners: &HashSet<i64>,
) -> Vec<participants::Model> {
    all.into_iter().filter(|p| !winners.contains(&p.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;
    use crate::entities::{draw_round_entity as draw_rounds, prize_entity as prizes};
    use crate::error::AppError;
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, Set};

    async fn seed_participant(conn: &sea_orm::DatabaseConnection, name: &str) -> i64 {
        participants::ActiveModel {
            name: Set(name.to_string()),
            employee_id: Set(format!("E-{name}")),
            avatar_url: Set(None),
            registered_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .unwrap()
        .id
    }

    #[test]
    fn test_exclude_winners_keeps_order() {
        let make = |id: i64| participants::Model {
            id,
            name: format!("p{id}"),
            employee_id: format!("E{id}"),
            avatar_url: None,
            registered_at: Utc::now(),
        };
        let all = vec![make(3), make(1), make(2)];
        let winners = HashSet::from([1]);
        let ids: Vec<i64> = exclude_winners(all, &winners).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test]
    async fn test_pool_excludes_winners_of_any_prize() {
        let pool = test_pool().await;
        let tracker = EligibilityTracker::new();

        let a = seed_participant(&pool, "a").await;
        let b = seed_participant(&pool, "b").await;
        let c = seed_participant(&pool, "c").await;
        assert_eq!(tracker.eligible_pool(&pool).await.unwrap().len(), 3);

        let prize = prizes::ActiveModel {
            name: Set("二等奖".into()),
            total_count: Set(5),
            remaining: Set(4),
            round_limit: Set(1),
            image: Set(None),
            sort_order: Set(0),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&pool)
        .await
        .unwrap();
        let round = draw_rounds::ActiveModel {
            prize_id: Set(prize.id),
            prize_name: Set(prize.name.clone()),
            round_nonce: Set("n-1".into()),
            is_extra: Set(false),
            drawn_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&pool)
        .await
        .unwrap();
        winner_links::ActiveModel {
            round_id: Set(round.id),
            participant_id: Set(b),
            ..Default::default()
        }
        .insert(&pool)
        .await
        .unwrap();

        let winners = tracker.winner_ids(&pool).await.unwrap();
        assert_eq!(winners, HashSet::from([b]));

        let eligible: HashSet<i64> = tracker
            .eligible_pool(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(eligible, HashSet::from([a, c]));
    }

    #[tokio::test]
    async fn test_unreadable_winner_list_is_an_error() {
        let pool = test_pool().await;
        let tracker = EligibilityTracker::new();
        seed_participant(&pool, "a").await;

        // 中奖名单读不到时不能当作没有人中奖
        pool.execute_unprepared("ALTER TABLE winner_links RENAME TO winner_links_offline")
            .await
            .unwrap();
        assert!(matches!(
            tracker.winner_ids(&pool).await,
            Err(AppError::StorageUnavailable(_))
        ));
        assert!(matches!(
            tracker.eligible_pool(&pool).await,
            Err(AppError::StorageUnavailable(_))
        ));
    }
}
