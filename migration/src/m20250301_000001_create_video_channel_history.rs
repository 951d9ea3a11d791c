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
        // One outcome per (channel_id, video_id); rows are never updated
        manager
            .create_table(
                Table::create()
                    .table(VideoChannelHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VideoChannelHistory::ChannelId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VideoChannelHistory::VideoId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VideoChannelHistory::DownloadStatus)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(VideoChannelHistory::ChannelStatus)
                            .string()
                            .not_null()
                            .default("Active"),
                    )
                    .col(ColumnDef::new(VideoChannelHistory::VideoDuration).double())
                    .col(ColumnDef::new(VideoChannelHistory::VideoWpm).integer())
                    .col(ColumnDef::new(VideoChannelHistory::VideoTitle).string())
                    .col(ColumnDef::new(VideoChannelHistory::VideoViewCount).big_integer())
                    .col(ColumnDef::new(VideoChannelHistory::VideoLikeCount).big_integer())
                    .col(ColumnDef::new(VideoChannelHistory::VideoUploadDate).date())
                    .col(ColumnDef::new(VideoChannelHistory::Reason).text())
                    .col(
                        ColumnDef::new(VideoChannelHistory::UpdateTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(VideoChannelHistory::ChannelId)
                            .col(VideoChannelHistory::VideoId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_history_channel_status")
                    .table(VideoChannelHistory::Table)
                    .col(VideoChannelHistory::ChannelId)
                    .col(VideoChannelHistory::ChannelStatus)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VideoChannelHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum VideoChannelHistory {
    Table,
    ChannelId,
    VideoId,
    DownloadStatus,
    ChannelStatus,
    VideoDuration,
    VideoWpm,
    VideoTitle,
    VideoViewCount,
    VideoLikeCount,
    VideoUploadDate,
    Reason,
    UpdateTime,
}
