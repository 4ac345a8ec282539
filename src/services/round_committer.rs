use crate::entities::{
    draw_round_entity as draw_rounds, participant_entity as participants, prize_entity as prizes,
    winner_link_entity as winner_links,
};
use crate::error::{AppError, AppResult};
use crate::models::RoundRecordResponse;
use crate::services::draw_session::SettledRound;
use crate::services::history_service::round_winners;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, TransactionTrait,
};
use std::collections::HashSet;

/// 开奖提交：在同一个事务中写入开奖记录、中奖关联并扣减奖项剩余名额。
///
/// 开奖扣减 `prizes.remaining` 与插入 `winner_links` 只走这里；重置与奖项编辑只做整体恢复或按差值平移。
#[derive(Clone)]
pub struct RoundCommitter {
    pool: DatabaseConnection,
}

impl RoundCommitter {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 提交一轮开奖
    ///
    /// 逻辑:
    /// 1. 校验中奖名单非空且不重复
    /// 2. 同一 nonce 已提交过则直接返回已有记录（不重复扣减）
    /// 3. 在事务内重新校验中奖资格（防止并发提交 / 过期客户端）
    /// 4. 写开奖记录与中奖关联
    /// 5. 扣减剩余名额；普通轮次使用 `remaining >= k` 条件更新，失败则整体回滚
    pub async fn commit(&self, round: &SettledRound) -> AppResult<RoundRecordResponse> {
        let winner_ids = validate_winner_list(&round.winners)?;
        let count = winner_ids.len() as i64;
        let nonce = round.nonce.to_string();

        let txn = self.pool.begin().await?;

        if let Some(existing) = draw_rounds::Entity::find()
            .filter(draw_rounds::Column::RoundNonce.eq(nonce.as_str()))
            .one(&txn)
            .await?
        {
            if existing.prize_id != round.prize_id {
                return Err(AppError::CommitRejected(
                    "Round nonce already used for another prize".into(),
                ));
            }
            log::info!(
                "Round {} already committed (nonce {}), returning stored record",
                existing.id,
                nonce
            );
            let mut winners = round_winners(&txn, &[existing.id]).await?;
            txn.commit().await?;
            let list = winners.remove(&existing.id).unwrap_or_default();
            return Ok(to_response(existing, list));
        }

        let prize = prizes::Entity::find_by_id(round.prize_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Prize not found".into()))?;

        // 重新校验：名单中任何人已在其它轮次中奖则拒绝
        let already_won = winner_links::Entity::find()
            .filter(winner_links::Column::ParticipantId.is_in(winner_ids.clone()))
            .count(&txn)
            .await?;
        if already_won > 0 {
            log::warn!(
                "Commit rejected for prize {}: {} winner(s) already won",
                prize.id,
                already_won
            );
            return Err(AppError::CommitRejected(
                "Some winners have already won a prize".into(),
            ));
        }

        let registered = participants::Entity::find()
            .filter(participants::Column::Id.is_in(winner_ids.clone()))
            .count(&txn)
            .await?;
        if registered != winner_ids.len() as u64 {
            return Err(AppError::CommitRejected(
                "Some winners are no longer registered".into(),
            ));
        }

        let record = draw_rounds::ActiveModel {
            prize_id: Set(prize.id),
            prize_name: Set(prize.name.clone()),
            round_nonce: Set(nonce),
            is_extra: Set(round.is_extra),
            drawn_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(AppError::from_commit_db_err)?;

        winner_links::Entity::insert_many(winner_ids.iter().map(|participant_id| {
            winner_links::ActiveModel {
                round_id: Set(record.id),
                participant_id: Set(*participant_id),
                ..Default::default()
            }
        }))
        .exec(&txn)
        .await
        .map_err(AppError::from_commit_db_err)?;

        // 补抽不检查剩余名额，按实际人数扣减（可能变为负数）
        let mut decrement = prizes::Entity::update_many()
            .col_expr(
                prizes::Column::Remaining,
                Expr::col(prizes::Column::Remaining).sub(count),
            )
            .col_expr(prizes::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(prizes::Column::Id.eq(prize.id));
        if !round.is_extra {
            decrement = decrement.filter(prizes::Column::Remaining.gte(count));
        }
        let updated = decrement.exec(&txn).await?;

        if updated.rows_affected != 1 {
            // 未提交的事务在 drop 时回滚，记录与关联都不会落库
            log::warn!(
                "Commit rejected for prize {}: {} winner(s) exceed remaining {}",
                prize.id,
                count,
                prize.remaining
            );
            return Err(AppError::CommitRejected(format!(
                "Prize '{}' does not have {} remaining award(s)",
                prize.name, count
            )));
        }

        txn.commit().await?;

        log::info!(
            "Committed round {} for prize {} ({} winner(s), extra: {})",
            record.id,
            prize.id,
            count,
            round.is_extra
        );

        Ok(to_response(record, round.winners.clone()))
    }
}

/// 名单必须非空且同一轮内不重复
fn validate_winner_list(winners: &[participants::Model]) -> AppResult<Vec<i64>> {
    if winners.is_empty() {
        return Err(AppError::ValidationError(
            "A round must have at least one winner".into(),
        ));
    }
    let mut seen = HashSet::with_capacity(winners.len());
    let mut ids = Vec::with_capacity(winners.len());
    for winner in winners {
        if !seen.insert(winner.id) {
            return Err(AppError::ValidationError(format!(
                "Participant {} appears twice in one round",
                winner.id
            )));
        }
        ids.push(winner.id);
    }
    Ok(ids)
}

fn to_response(
    record: draw_rounds::Model,
    winners: Vec<participants::Model>,
) -> RoundRecordResponse {
    RoundRecordResponse {
        id: record.id,
        prize_id: record.prize_id,
        prize_name: record.prize_name,
        is_extra: record.is_extra,
        drawn_at: record.drawn_at,
        winners: winners.into_iter().map(Into::into).collect(),
    }
}
