// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// 存储错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 对象不存在
    #[error("Object not found: {0}")]
    NotFound(String),
    /// 不支持的对象格式
    #[error("Object conversion for filetype {0} is not implemented")]
    UnsupportedFormat(String),
    /// 对象内容解析失败
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// 存储错误
    #[error("Storage error: {0}")]
    Other(String),
}

/// 存储仓库特质
///
/// 定义对象存储访问接口，每个实例对应一个存储桶
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// 使用指定键保存数据到存储中
    async fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// 根据键从存储中检索数据
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// 上传本地文件，成功后删除本地文件
    async fn upload_file(&self, path: &Path, key: &str) -> Result<(), StorageError> {
        let data = tokio::fs::read(path).await?;
        self.save(key, &data).await?;
        tokio::fs::remove_file(path).await?;
        Ok(())
    }

    /// 读取并解析结构化对象，目前只支持 JSON
    async fn load_json(&self, key: &str) -> Result<serde_json::Value, StorageError> {
        let extension = key.rsplit('.').next().unwrap_or_default();
        if extension != "json" {
            return Err(StorageError::UnsupportedFormat(extension.to_string()));
        }
        let data = self
            .get(key)
            .await?
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        Ok(serde_json::from_slice(&data)?)
    }
}
