// ==========================================
// 企业名录系统 - 暂存文件守卫
// ==========================================
// 职责: 持有上传暂存文件，管道退出时删除且只删除一次
// 覆盖: 成功 / 致命错误 / panic / future 被取消（drop）
// 说明: 删除失败只记录 warn，不向上抛出
// ==========================================

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// 暂存文件删除失败（非致命）
#[derive(Error, Debug)]
#[error("failed to remove staged file {}: {source}", .path.display())]
pub struct CleanupError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// 暂存文件守卫
///
/// 在管道入口创建；`release()` 显式删除，未显式删除时由 `Drop` 兜底。
///
/// # 示例
/// ```no_run
/// use corp_directory_import::importer::StagedFile;
/// let staged = StagedFile::new("/tmp/upload-123.csv");
/// // 读取 staged.path() ...
/// drop(staged); // 文件在此被删除
/// ```
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    released: bool,
}

impl StagedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            released: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 删除暂存文件（重复调用为空操作）
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        match Self::remove(&self.path) {
            Ok(true) => debug!(path = %self.path.display(), "暂存文件已删除"),
            Ok(false) => debug!(path = %self.path.display(), "暂存文件已不存在，跳过删除"),
            Err(e) => warn!(error = %e, "暂存文件删除失败"),
        }
    }

    /// Ok(false) 表示文件本就不存在
    fn remove(path: &Path) -> Result<bool, CleanupError> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(CleanupError {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        self.release();
    }
}
