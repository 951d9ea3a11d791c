// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::history::{ChannelOutcome, ChannelStatus, HistoryRecord};
use crate::domain::repositories::history_repository::{
    HistoryCursor, HistoryPage, HistoryRepository, RepositoryError,
};
use crate::infrastructure::database::entities::history as history_entity;
use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;

/// 历史记录仓库实现
///
/// 基于SeaORM实现的历史记录数据访问层
#[derive(Clone)]
pub struct HistoryRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl HistoryRepositoryImpl {
    /// 创建新的历史记录仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl TryFrom<history_entity::Model> for HistoryRecord {
    type Error = RepositoryError;

    fn try_from(model: history_entity::Model) -> Result<Self, Self::Error> {
        let channel_status = model.channel_status.parse().map_err(|_| {
            RepositoryError::Corrupt(format!(
                "unknown channel_status '{}' for {}/{}",
                model.channel_status, model.channel_id, model.video_id
            ))
        })?;

        Ok(Self {
            channel_id: model.channel_id,
            video_id: model.video_id,
            download_status: model.download_status,
            channel_status,
            video_duration: model.video_duration,
            video_wpm: model.video_wpm.map(|wpm| wpm.max(0) as u32),
            video_title: model.video_title,
            video_view_count: model.video_view_count,
            video_like_count: model.video_like_count,
            video_upload_date: model.video_upload_date,
            reason: model.reason,
            update_time: model.update_time,
        })
    }
}

impl From<&HistoryRecord> for history_entity::ActiveModel {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            channel_id: Set(record.channel_id.clone()),
            video_id: Set(record.video_id.clone()),
            download_status: Set(record.download_status),
            channel_status: Set(record.channel_status.to_string()),
            video_duration: Set(record.video_duration),
            video_wpm: Set(record
                .video_wpm
                .map(|wpm| i32::try_from(wpm).unwrap_or(i32::MAX))),
            video_title: Set(record.video_title.clone()),
            video_view_count: Set(record.video_view_count),
            video_like_count: Set(record.video_like_count),
            video_upload_date: Set(record.video_upload_date),
            reason: Set(record.reason.clone()),
            update_time: Set(record.update_time),
        }
    }
}

#[async_trait]
impl HistoryRepository for HistoryRepositoryImpl {
    async fn append(&self, record: &HistoryRecord) -> Result<bool, RepositoryError> {
        let model: history_entity::ActiveModel = record.into();

        let inserted = history_entity::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    history_entity::Column::ChannelId,
                    history_entity::Column::VideoId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await?;

        Ok(inserted > 0)
    }

    async fn has_channel_status(
        &self,
        channel_id: &str,
        status: ChannelStatus,
    ) -> Result<bool, RepositoryError> {
        let count = history_entity::Entity::find()
            .filter(history_entity::Column::ChannelId.eq(channel_id))
            .filter(history_entity::Column::ChannelStatus.eq(status.to_string()))
            .count(self.db.as_ref())
            .await?;

        Ok(count > 0)
    }

    async fn channel_outcomes(
        &self,
        channel_id: &str,
        status: ChannelStatus,
    ) -> Result<Vec<ChannelOutcome>, RepositoryError> {
        let rows: Vec<(bool, Option<f64>)> = history_entity::Entity::find()
            .select_only()
            .column(history_entity::Column::DownloadStatus)
            .column(history_entity::Column::VideoDuration)
            .filter(history_entity::Column::ChannelId.eq(channel_id))
            .filter(history_entity::Column::ChannelStatus.eq(status.to_string()))
            .into_tuple()
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(download_status, video_duration)| ChannelOutcome {
                download_status,
                video_duration,
            })
            .collect())
    }

    async fn exists(&self, channel_id: &str, video_id: &str) -> Result<bool, RepositoryError> {
        let count = history_entity::Entity::find()
            .filter(history_entity::Column::ChannelId.eq(channel_id))
            .filter(history_entity::Column::VideoId.eq(video_id))
            .count(self.db.as_ref())
            .await?;

        Ok(count > 0)
    }

    async fn scan_page(
        &self,
        cursor: Option<HistoryCursor>,
        limit: u64,
    ) -> Result<HistoryPage, RepositoryError> {
        let limit = limit.max(1);
        let mut query = history_entity::Entity::find()
            .order_by_asc(history_entity::Column::ChannelId)
            .order_by_asc(history_entity::Column::VideoId);

        if let Some(cursor) = cursor {
            query = query.filter(
                Condition::any()
                    .add(history_entity::Column::ChannelId.gt(cursor.channel_id.clone()))
                    .add(
                        Condition::all()
                            .add(history_entity::Column::ChannelId.eq(cursor.channel_id))
                            .add(history_entity::Column::VideoId.gt(cursor.video_id)),
                    ),
            );
        }

        // One extra row tells whether another page exists
        let mut models = query.limit(limit + 1).all(self.db.as_ref()).await?;
        let has_more = models.len() as u64 > limit;
        models.truncate(limit as usize);

        let records = models
            .into_iter()
            .map(HistoryRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let next_cursor = if has_more {
            records.last().map(HistoryCursor::from)
        } else {
            None
        };

        Ok(HistoryPage {
            records,
            next_cursor,
        })
    }
}
