// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Jobs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Jobs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Jobs::JobType).string().not_null())
                    .col(ColumnDef::new(Jobs::Status).string().not_null())
                    .col(ColumnDef::new(Jobs::LockKey).string())
                    .col(ColumnDef::new(Jobs::Payload).json().not_null())
                    .col(ColumnDef::new(Jobs::ScheduledAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Jobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Jobs::StartedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Jobs::CompletedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Jobs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Jobs::LockToken).uuid())
                    .col(ColumnDef::new(Jobs::LockExpiresAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Jobs::ErrorMessage).text())
                    .to_owned(),
            )
            .await?;

        // 调度器按 (lock_key, status) 查询待替换的任务
        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_lock_key_status")
                    .table(Jobs::Table)
                    .col(Jobs::LockKey)
                    .col(Jobs::Status)
                    .to_owned(),
            )
            .await?;

        // Worker 按 status + scheduled_at 拉取任务
        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_status_scheduled_at")
                    .table(Jobs::Table)
                    .col(Jobs::Status)
                    .col(Jobs::ScheduledAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Jobs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Jobs {
    Table,
    Id,
    JobType,
    Status,
    LockKey,
    Payload,
    ScheduledAt,
    CreatedAt,
    StartedAt,
    CompletedAt,
    UpdatedAt,
    LockToken,
    LockExpiresAt,
    ErrorMessage,
}
