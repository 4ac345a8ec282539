use sea_orm_migration::prelude::*;

/// 报名参与者
#[derive(DeriveIden)]
enum Participants {
    Table,
    Id,
    Name,
    EmployeeId,
    AvatarUrl,
    RegisteredAt,
}

/// 奖项配置 (remaining 由开奖提交扣减，补抽后可为负数)
#[derive(DeriveIden)]
enum Prizes {
    Table,
    Id,
    Name,
    TotalCount,
    Remaining,
    RoundLimit,
    Image,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

/// 每一轮开奖的历史记录 (只追加)
#[derive(DeriveIden)]
enum DrawRounds {
    Table,
    Id,
    PrizeId,
    PrizeName,
    RoundNonce,
    IsExtra,
    DrawnAt,
}

/// 中奖者与开奖轮次的关联
#[derive(DeriveIden)]
enum WinnerLinks {
    Table,
    Id,
    RoundId,
    ParticipantId,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Participants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Participants::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Participants::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Participants::EmployeeId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Participants::AvatarUrl).text().null())
                    .col(
                        ColumnDef::new(Participants::RegisteredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 同名同工号只允许报名一次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_participants_name_employee_unique")
                    .table(Participants::Table)
                    .col(Participants::Name)
                    .col(Participants::EmployeeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Prizes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Prizes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Prizes::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Prizes::TotalCount).big_integer().not_null())
                    // 补抽可能让 remaining 变为负数，因此不加 CHECK 约束
                    .col(ColumnDef::new(Prizes::Remaining).big_integer().not_null())
                    .col(
                        ColumnDef::new(Prizes::RoundLimit)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Prizes::Image).text().null())
                    .col(
                        ColumnDef::new(Prizes::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Prizes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Prizes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_prizes_sort_order_unique")
                    .table(Prizes::Table)
                    .col(Prizes::SortOrder)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DrawRounds::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DrawRounds::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DrawRounds::PrizeId).big_integer().not_null())
                    .col(
                        ColumnDef::new(DrawRounds::PrizeName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DrawRounds::RoundNonce)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DrawRounds::IsExtra)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(DrawRounds::DrawnAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_draw_rounds_prize")
                            .from(DrawRounds::Table, DrawRounds::PrizeId)
                            .to(Prizes::Table, Prizes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 重复提交同一轮时依靠该索引识别
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_draw_rounds_nonce_unique")
                    .table(DrawRounds::Table)
                    .col(DrawRounds::RoundNonce)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_draw_rounds_prize")
                    .table(DrawRounds::Table)
                    .col(DrawRounds::PrizeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WinnerLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WinnerLinks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WinnerLinks::RoundId).big_integer().not_null())
                    .col(
                        ColumnDef::new(WinnerLinks::ParticipantId)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_winner_links_round")
                            .from(WinnerLinks::Table, WinnerLinks::RoundId)
                            .to(DrawRounds::Table, DrawRounds::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_winner_links_participant")
                            .from(WinnerLinks::Table, WinnerLinks::ParticipantId)
                            .to(Participants::Table, Participants::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 每个人在所有轮次中最多中奖一次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_winner_links_participant_unique")
                    .table(WinnerLinks::Table)
                    .col(WinnerLinks::ParticipantId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_winner_links_round")
                    .table(WinnerLinks::Table)
                    .col(WinnerLinks::RoundId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除顺序：中奖关联 -> 开奖记录 -> 奖项 -> 参与者
        manager
            .drop_table(Table::drop().if_exists().table(WinnerLinks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(DrawRounds::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Prizes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Participants::Table).to_owned())
            .await?;
        Ok(())
    }
}
