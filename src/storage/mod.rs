//! 对象存储能力：拿一组临时凭证，把本地文件放到指定的 object key 下。

use crate::publish::models::CredentialData;
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

mod cos;

pub use cos::CosStorage;

/// 单次上传能力。凭证只在这一次调用内有效，由调用方传入。
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload_file(
        &self,
        credentials: &CredentialData,
        local_file_path: &Path,
        object_key: &str,
    ) -> Result<()>;
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use anyhow::anyhow;
    use std::sync::Mutex;

    /// 测试用假存储：记录 (bucket, key)，可配置为总是失败
    pub struct FakeStorage {
        uploads: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl FakeStorage {
        pub fn new() -> Self {
            Self {
                uploads: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        pub fn failing() -> Self {
            Self {
                uploads: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn uploads(&self) -> Vec<(String, String)> {
            self.uploads.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ObjectStorage for FakeStorage {
        async fn upload_file(
            &self,
            credentials: &CredentialData,
            _local_file_path: &Path,
            object_key: &str,
        ) -> Result<()> {
            if self.fail {
                return Err(anyhow!("FakeStorage 配置为上传失败"));
            }
            self.uploads
                .lock()
                .unwrap()
                .push((credentials.bucket.clone(), object_key.to_string()));
            Ok(())
        }
    }
}
