//! 单个奖项的开奖会话状态机: `Idle -> Rolling -> Settled -> Idle`
//!
//! 状态机本身不做任何持久化，只负责轮次人数的上下限、补抽规则以及不放回抽样。
//! 写库由 `RoundCommitter` 完成；进程重启后会话丢失，可由奖项与奖池重新构建。

use crate::entities::{participant_entity as participants, prize_entity as prizes};
use crate::error::{AppError, AppResult};
use crate::models::DrawPhase;
use crate::utils::sample_without_replacement;
use rand::Rng;
use uuid::Uuid;

/// 一轮开奖的默认人数与可选上限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundBounds {
    pub default_size: i64,
    pub max_draw_count: i64,
}

impl RoundBounds {
    /// 普通轮次上限为 `min(remaining, 奖池人数)`；补抽忽略 remaining
    pub fn compute(prize: &prizes::Model, pool_size: usize, is_extra: bool) -> Self {
        let pool = pool_size as i64;
        let max_draw_count = if is_extra {
            pool
        } else {
            prize.remaining.max(0).min(pool)
        };
        Self {
            default_size: prize.round_limit.min(max_draw_count).max(1),
            max_draw_count,
        }
    }
}

/// 已确定中奖者、等待提交的一轮
#[derive(Debug, Clone, PartialEq)]
pub struct SettledRound {
    pub prize_id: i64,
    pub nonce: Uuid,
    pub is_extra: bool,
    pub winners: Vec<participants::Model>,
}

#[derive(Debug, Clone)]
pub struct DrawSession {
    prize_id: i64,
    phase: DrawPhase,
    is_extra: bool,
    round_size: i64,
    max_draw_count: i64,
    nonce: Option<Uuid>,
    winners: Vec<participants::Model>,
}

impl DrawSession {
    pub fn new(prize_id: i64) -> Self {
        Self {
            prize_id,
            phase: DrawPhase::Idle,
            is_extra: false,
            round_size: 1,
            max_draw_count: 0,
            nonce: None,
            winners: Vec::new(),
        }
    }

    pub fn prize_id(&self) -> i64 {
        self.prize_id
    }

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    pub fn is_extra(&self) -> bool {
        self.is_extra
    }

    pub fn round_size(&self) -> i64 {
        self.round_size
    }

    pub fn max_draw_count(&self) -> i64 {
        self.max_draw_count
    }

    pub fn pending_winners(&self) -> &[participants::Model] {
        &self.winners
    }

    /// 空闲时根据最新的奖项与奖池刷新默认人数（奖池在每次提交后都会变化）
    pub fn refresh_bounds(&mut self, prize: &prizes::Model, pool_size: usize) {
        if self.phase != DrawPhase::Idle {
            return;
        }
        let bounds = RoundBounds::compute(prize, pool_size, false);
        self.round_size = bounds.default_size;
        self.max_draw_count = bounds.max_draw_count;
    }

    /// 开始滚动。普通轮次要求 remaining > 0；补抽只要求奖池非空
    pub fn start(
        &mut self,
        prize: &prizes::Model,
        pool_size: usize,
        is_extra: bool,
    ) -> AppResult<()> {
        self.ensure_prize(prize)?;
        match self.phase {
            DrawPhase::Idle => {}
            DrawPhase::Rolling => {
                return Err(AppError::InvalidState(
                    "A round is already rolling for this prize".into(),
                ));
            }
            DrawPhase::Settled => {
                return Err(AppError::InvalidState(
                    "The previous round is settled but not yet committed".into(),
                ));
            }
        }
        if pool_size == 0 {
            return Err(AppError::InvalidState(
                "No eligible participants left".into(),
            ));
        }
        if !is_extra && prize.is_exhausted() {
            return Err(AppError::InvalidState(format!(
                "Prize '{}' has no remaining awards; use an extra round",
                prize.name
            )));
        }

        let bounds = RoundBounds::compute(prize, pool_size, is_extra);
        self.phase = DrawPhase::Rolling;
        self.is_extra = is_extra;
        self.round_size = bounds.default_size;
        self.max_draw_count = bounds.max_draw_count;
        self.nonce = Some(Uuid::new_v4());
        self.winners.clear();
        Ok(())
    }

    /// 停止前调整本轮人数，范围 `[1, max_draw_count]`
    pub fn set_round_size(&mut self, round_size: i64) -> AppResult<()> {
        if self.phase != DrawPhase::Rolling {
            return Err(AppError::InvalidState(
                "Round size can only be changed while rolling".into(),
            ));
        }
        if round_size < 1 || round_size > self.max_draw_count {
            return Err(AppError::OutOfRange(format!(
                "Round size must be between 1 and {}",
                self.max_draw_count
            )));
        }
        self.round_size = round_size;
        Ok(())
    }

    /// 停止滚动并抽出中奖者 (`Rolling -> Settled`)
    ///
    /// 人数 k = min(round_size, remaining, 奖池人数)，补抽时不受 remaining 限制。
    pub fn settle<R>(
        &mut self,
        prize: &prizes::Model,
        pool: Vec<participants::Model>,
        rng: &mut R,
    ) -> AppResult<SettledRound>
    where
        R: Rng + ?Sized,
    {
        self.ensure_prize(prize)?;
        if self.phase != DrawPhase::Rolling {
            return Err(AppError::InvalidState("No round is rolling".into()));
        }

        let mut count = self.round_size.min(pool.len() as i64);
        if !self.is_extra {
            count = count.min(prize.remaining.max(0));
        }
        if count <= 0 {
            // 滚动期间奖池或名额已被清空，本轮无法完成
            self.reset();
            return Err(AppError::InvalidState(
                "Nothing left to draw for this round".into(),
            ));
        }

        self.winners = sample_without_replacement(pool, count as usize, rng);
        self.phase = DrawPhase::Settled;
        self.settled_round()
            .ok_or_else(|| AppError::InternalError("settled round missing".into()))
    }

    /// Settled 阶段待提交的轮次
    pub fn settled_round(&self) -> Option<SettledRound> {
        if self.phase != DrawPhase::Settled {
            return None;
        }
        Some(SettledRound {
            prize_id: self.prize_id,
            nonce: self.nonce?,
            is_extra: self.is_extra,
            winners: self.winners.clone(),
        })
    }

    /// 提交成功或被拒绝后回到空闲
    pub fn complete(&mut self) {
        self.reset();
    }

    /// 取消当前轮次，不产生任何数据变化
    pub fn cancel(&mut self) -> AppResult<()> {
        if self.phase == DrawPhase::Idle {
            return Err(AppError::InvalidState("No round to cancel".into()));
        }
        self.reset();
        Ok(())
    }

    /// 停止前取消补抽，人数恢复为普通轮次的默认值
    pub fn cancel_extra(&mut self, prize: &prizes::Model, pool_size: usize) -> AppResult<()> {
        self.ensure_prize(prize)?;
        if !self.is_extra || self.phase != DrawPhase::Rolling {
            return Err(AppError::InvalidState(
                "No extra round in progress".into(),
            ));
        }
        self.reset();
        self.refresh_bounds(prize, pool_size);
        Ok(())
    }

    fn reset(&mut self) {
        self.phase = DrawPhase::Idle;
        self.is_extra = false;
        self.nonce = None;
        self.winners.clear();
    }

    fn ensure_prize(&self, prize: &prizes::Model) -> AppResult<()> {
        if prize.id != self.prize_id {
            return Err(AppError::InternalError(format!(
                "session for prize {} received prize {}",
                self.prize_id, prize.id
            )));
        }
        Ok(())
    }
}
