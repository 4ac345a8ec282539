use crate::entities::{
    draw_round_entity as draw_rounds, participant_entity as participants,
    winner_link_entity as winner_links,
};
use crate::error::AppResult;
use crate::models::{RoundRecordResponse, WinnerExportRow};
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;

#[derive(Clone)]
pub struct HistoryService {
    pool: DatabaseConnection,
}

impl HistoryService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 开奖历史（倒序），附带每轮中奖者
    pub async fn list_history(&self) -> AppResult<Vec<RoundRecordResponse>> {
        let rounds = draw_rounds::Entity::find()
            .order_by_desc(draw_rounds::Column::DrawnAt)
            .order_by_desc(draw_rounds::Column::Id)
            .all(&self.pool)
            .await?;
        let ids: Vec<i64> = rounds.iter().map(|r| r.id).collect();
        let mut winners = round_winners(&self.pool, &ids).await?;

        Ok(rounds
            .into_iter()
            .map(|r| RoundRecordResponse {
                winners: winners
                    .remove(&r.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(Into::into)
                    .collect(),
                id: r.id,
                prize_id: r.prize_id,
                prize_name: r.prize_name,
                is_extra: r.is_extra,
                drawn_at: r.drawn_at,
            })
            .collect())
    }

    /// 中奖名单导出行，每位中奖者一行，最近的轮次在前
    pub async fn export_rows(&self) -> AppResult<Vec<WinnerExportRow>> {
        let history = self.list_history().await?;
        Ok(history
            .into_iter()
            .flat_map(|round| {
                let prize_name = round.prize_name;
                let drawn_at = round.drawn_at;
                let is_extra = round.is_extra;
                round.winners.into_iter().map(move |w| WinnerExportRow {
                    participant_name: w.name,
                    employee_id: w.employee_id,
                    prize_name: prize_name.clone(),
                    drawn_at,
                    is_extra,
                })
            })
            .collect())
    }
}

/// 按轮次加载中奖者；中奖者顺序与写入顺序一致
pub async fn round_winners<C>(
    conn: &C,
    round_ids: &[i64],
) -> AppResult<HashMap<i64, Vec<participants::Model>>>
where
    C: ConnectionTrait,
{
    if round_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let links = winner_links::Entity::find()
        .filter(winner_links::Column::RoundId.is_in(round_ids.iter().copied()))
        .order_by_asc(winner_links::Column::Id)
        .all(conn)
        .await?;

    let people: HashMap<i64, participants::Model> = participants::Entity::find()
        .filter(participants::Column::Id.is_in(links.iter().map(|l| l.participant_id)))
        .all(conn)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let mut grouped: HashMap<i64, Vec<participants::Model>> = HashMap::new();
    for link in links {
        if let Some(person) = people.get(&link.participant_id) {
            grouped.entry(link.round_id).or_default().push(person.clone());
        }
    }
    Ok(grouped)
}
