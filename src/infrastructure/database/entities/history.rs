// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "video_channel_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub channel_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub video_id: String,
    pub download_status: bool,
    pub channel_status: String,
    #[sea_orm(column_type = "Double", nullable)]
    pub video_duration: Option<f64>,
    pub video_wpm: Option<i32>,
    pub video_title: Option<String>,
    pub video_view_count: Option<i64>,
    pub video_like_count: Option<i64>,
    pub video_upload_date: Option<ChronoDate>,
    #[sea_orm(column_type = "Text", nullable)]
    pub reason: Option<String>,
    pub update_time: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
