// Dev utility: stage a local CSV/JSON file and run it through the import pipeline.
//
// Usage:
//   cargo run -- <file> <mime> <companies|people> [db_path]
//
// The input is copied into the temp dir first; only the staged copy is consumed.

use anyhow::{bail, Context};
use corp_directory_import::config::{get_default_db_path, ConfigManager};
use corp_directory_import::db::{init_schema, open_sqlite_connection};
use corp_directory_import::{logging, DirectoryImportRepositoryImpl, DirectoryImporter, DirectoryImporterImpl};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let (Some(file), Some(mime), Some(kind)) = (args.next(), args.next(), args.next()) else {
        bail!("usage: corp-directory-import <file> <mime> <companies|people> [db_path]");
    };
    let db_path = args.next().unwrap_or_else(get_default_db_path);

    tracing::info!(version = corp_directory_import::VERSION, db_path = %db_path, "{}", corp_directory_import::APP_NAME);

    let conn = open_sqlite_connection(&db_path).with_context(|| format!("open {}", db_path))?;
    init_schema(&conn).context("init schema")?;
    let conn = Arc::new(Mutex::new(conn));

    let repo = DirectoryImportRepositoryImpl::from_connection(conn.clone())?;
    let config = ConfigManager::from_connection(conn);
    let importer = DirectoryImporterImpl::new(repo, config);

    let source = PathBuf::from(&file);
    let extension = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let staged = std::env::temp_dir().join(format!("upload-{}{}", Uuid::new_v4(), extension));
    std::fs::copy(&source, &staged).with_context(|| format!("stage {}", file))?;

    let result = importer.import_staged_upload(staged, &mime, &kind).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
