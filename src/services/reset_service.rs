use crate::entities::{
    draw_round_entity as draw_rounds, participant_entity as participants, prize_entity as prizes,
    winner_link_entity as winner_links,
};
use crate::error::AppResult;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};

/// 全量重置与仅重置开奖结果；两者都在单个事务中完成
#[derive(Clone)]
pub struct ResetService {
    pool: DatabaseConnection,
}

impl ResetService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 清空开奖记录、奖项与报名名单
    pub async fn full_reset(&self) -> AppResult<()> {
        let txn = self.pool.begin().await?;
        let links = winner_links::Entity::delete_many().exec(&txn).await?;
        let rounds = draw_rounds::Entity::delete_many().exec(&txn).await?;
        let prize_rows = prizes::Entity::delete_many().exec(&txn).await?;
        let people = participants::Entity::delete_many().exec(&txn).await?;
        txn.commit().await?;

        log::warn!(
            "Full reset: removed {} round(s), {} winner link(s), {} prize(s), {} participant(s)",
            rounds.rows_affected,
            links.rows_affected,
            prize_rows.rows_affected,
            people.rows_affected
        );
        Ok(())
    }

    /// 清空开奖记录并恢复每个奖项的剩余名额，保留奖项与报名名单
    pub async fn reset_lottery(&self) -> AppResult<()> {
        let txn = self.pool.begin().await?;
        winner_links::Entity::delete_many().exec(&txn).await?;
        let rounds = draw_rounds::Entity::delete_many().exec(&txn).await?;
        prizes::Entity::update_many()
            .col_expr(
                prizes::Column::Remaining,
                Expr::col(prizes::Column::TotalCount).into(),
            )
            .col_expr(prizes::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        log::warn!("Lottery reset: removed {} round(s)", rounds.rows_affected);
        Ok(())
    }
}
