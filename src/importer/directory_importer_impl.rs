// ==========================================
// 企业名录系统 - 导入编排器实现
// ==========================================
// 状态机: Received → Parsing → Validating → Resolving(仅人员) → Loading → Completed | Failed
// 流程: 守卫暂存文件 → 解析 → 校验 → 解析雇主 → 批量写入 → 删除暂存文件
// 诊断: 校验 / 解析 / 写入三个阶段的单条拒绝按记录序号汇总
// ==========================================

use crate::config::{ImportConfigReader, ImportOptions};
use crate::domain::{EntityKind, ImportRequest, ImportResult, ImportStage, RecordRejection};
use crate::importer::bulk_loader::BulkLoader;
use crate::importer::error::{ImportError, PipelineResult};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::DirectoryImporter;
use crate::importer::record_validator::RecordValidator;
use crate::importer::reference_resolver::ReferenceResolver;
use crate::importer::staged_file::StagedFile;
use crate::repository::DirectoryImportRepository;
use async_trait::async_trait;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

// ==========================================
// PipelineState - 单次导入的阶段跟踪
// ==========================================
struct PipelineState {
    stage: ImportStage,
}

impl PipelineState {
    fn new() -> Self {
        Self {
            stage: ImportStage::Received,
        }
    }

    fn advance(&mut self, next: ImportStage) -> PipelineResult<()> {
        if !self.stage.can_advance_to(next) {
            return Err(ImportError::InternalError(format!(
                "illegal stage transition {} -> {}",
                self.stage, next
            )));
        }
        info!(from = %self.stage, to = %next, "导入阶段切换");
        self.stage = next;
        Ok(())
    }

    fn fail(&mut self, err: &ImportError) {
        error!(stage = %self.stage, error = %err, kind = ?err.failure_kind(), "导入失败");
        self.stage = ImportStage::Failed;
    }
}

// ==========================================
// DirectoryImporterImpl - 导入编排器
// ==========================================
pub struct DirectoryImporterImpl<R, C>
where
    R: DirectoryImportRepository,
    C: ImportConfigReader,
{
    // 数据访问层
    repo: R,

    // 配置读取器
    config: C,

    // 导入组件
    loader: BulkLoader,
}

impl<R, C> DirectoryImporterImpl<R, C>
where
    R: DirectoryImportRepository,
    C: ImportConfigReader,
{
    /// 创建新的 DirectoryImporter 实例
    ///
    /// # 参数
    /// - repo: 导入数据仓储（同时提供公司名称查找）
    /// - config: 配置读取器
    pub fn new(repo: R, config: C) -> Self {
        Self {
            repo,
            config,
            loader: BulkLoader::new(),
        }
    }

    /// 在 `import` span 内执行整条管道；守卫在任何退出路径上删除文件
    async fn execute(
        &self,
        mut staged: StagedFile,
        declared_mime_type: &str,
        kind: EntityKind,
    ) -> PipelineResult<ImportResult> {
        let import_id = Uuid::new_v4().to_string();
        let span = info_span!(
            "import",
            import_id = %import_id,
            entity_kind = %kind,
            file = %staged.path().display()
        );

        async move {
            let mut state = PipelineState::new();
            info!(mime = %declared_mime_type, "开始导入");

            let outcome = self
                .run_stages(&mut state, &staged, declared_mime_type, kind)
                .await;

            match &outcome {
                Ok(result) => info!(
                    total = result.total_records,
                    inserted = result.inserted_count,
                    skipped = result.skipped_count,
                    "导入完成"
                ),
                Err(e) => state.fail(e),
            }

            staged.release();
            outcome
        }
        .instrument(span)
        .await
    }

    async fn run_stages(
        &self,
        state: &mut PipelineState,
        staged: &StagedFile,
        declared_mime_type: &str,
        kind: EntityKind,
    ) -> PipelineResult<ImportResult> {
        // 配置快照（本次导入内不再读取）
        let options = ImportOptions::load(&self.config)
            .await
            .map_err(|e| ImportError::StoreError(format!("failed to read import config: {}", e)))?;
        debug!(?options, "导入配置已加载");

        // === 步骤 1: 解析 ===
        state.advance(ImportStage::Parsing)?;
        let file = File::open(staged.path())?;
        let records = UniversalFileParser.parse(BufReader::new(file), declared_mime_type, kind)?;

        // === 步骤 2: 校验（CSV 流在此被逐行消费）===
        state.advance(ImportStage::Validating)?;
        let report = RecordValidator::partition(kind, records)?;
        let total_records = report.total;
        let mut rejected: Vec<RecordRejection> = report.rejected;

        info!(
            total = total_records,
            valid = report.valid.len(),
            rejected = rejected.len(),
            "记录校验完成"
        );

        if report.valid.is_empty() {
            return Err(ImportError::NoValidRecords(kind));
        }

        // === 步骤 3/4: 解析雇主（仅人员）+ 批量写入 ===
        let load = match kind {
            EntityKind::Company => {
                state.advance(ImportStage::Loading)?;
                self.loader.load_companies(&self.repo, report.valid).await?
            }
            EntityKind::Person => {
                state.advance(ImportStage::Resolving)?;
                let resolution = ReferenceResolver::new(&options)
                    .resolve(&self.repo, report.valid)
                    .await?;

                info!(
                    resolved = resolution.resolved.len(),
                    dropped = resolution.rejected.len(),
                    lookups = resolution.lookups,
                    "雇主解析完成"
                );
                rejected.extend(resolution.rejected);

                if resolution.resolved.is_empty() {
                    return Err(ImportError::NoValidRecords(kind));
                }

                state.advance(ImportStage::Loading)?;
                self.loader.load_people(&self.repo, resolution.resolved).await?
            }
        };
        rejected.extend(load.rejected);

        // 诊断按源记录顺序输出
        rejected.sort_by_key(|r| r.record_number);

        state.advance(ImportStage::Completed)?;

        Ok(ImportResult {
            entity_kind: kind,
            total_records,
            inserted_count: load.inserted,
            skipped_count: rejected.len(),
            diagnostics: rejected.into_iter().map(|r| r.reason).collect(),
        })
    }
}

#[async_trait]
impl<R, C> DirectoryImporter for DirectoryImporterImpl<R, C>
where
    R: DirectoryImportRepository + Send + Sync,
    C: ImportConfigReader + Send + Sync,
{
    async fn import(&self, request: ImportRequest) -> PipelineResult<ImportResult> {
        let staged = StagedFile::new(request.staged_file_path);
        self.execute(staged, &request.declared_mime_type, request.entity_kind)
            .await
    }

    async fn import_staged_upload(
        &self,
        staged_file_path: PathBuf,
        declared_mime_type: &str,
        entity_kind: &str,
    ) -> PipelineResult<ImportResult> {
        // 先接管文件，参数非法时同样删除
        let staged = StagedFile::new(staged_file_path);

        let kind = match entity_kind.parse::<EntityKind>() {
            Ok(kind) => kind,
            Err(raw) => {
                warn!(entity_kind = %raw, path = %staged.path().display(), "未知实体类型");
                return Err(ImportError::UnknownEntityKind(raw));
            }
        };

        self.execute(staged, declared_mime_type, kind).await
    }
}
