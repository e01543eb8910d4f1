use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tempfile::NamedTempFile;
use tickbox_app::{Store, TaskRecord};
use tracing::{debug, info};
use uuid::Uuid;

/// A collection kept as one JSON object per line in
/// `<data_dir>/<collection>.data`, rewritten atomically on every change.
#[derive(Debug)]
pub struct FileStore {
    pub data_dir: PathBuf,
    pub path: PathBuf,
}

impl FileStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path, collection: &str) -> anyhow::Result<Self> {
        if collection.is_empty()
            || collection.contains(['/', '\\'])
            || collection.starts_with('.')
        {
            return Err(anyhow!("invalid collection name: {collection:?}"));
        }

        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let path = data_dir.join(format!("{collection}.data"));
        if !path.exists() {
            fs::write(&path, "").with_context(|| format!("failed to create {}", path.display()))?;
        }

        info!(
            data_dir = %data_dir.display(),
            file = %path.display(),
            "opened datastore"
        );

        Ok(Self { data_dir, path })
    }

    fn write_all(&self, records: &[TaskRecord]) -> anyhow::Result<()> {
        save_jsonl_atomic(&self.path, records)
            .with_context(|| format!("failed to save {}", self.path.display()))
    }
}

impl Store for FileStore {
    #[tracing::instrument(skip(self))]
    fn load_all(&self) -> anyhow::Result<Vec<TaskRecord>> {
        load_jsonl(&self.path).with_context(|| format!("failed to load {}", self.path.display()))
    }

    #[tracing::instrument(skip(self, record), fields(id = %record.id))]
    fn save(&mut self, record: &TaskRecord) -> anyhow::Result<()> {
        let mut records = self.load_all()?;
        match records.iter_mut().find(|existing| existing.id == record.id) {
            Some(slot) => *slot = record.clone(),
            None => records.push(record.clone()),
        }
        self.write_all(&records)
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    fn delete(&mut self, id: Uuid) -> anyhow::Result<()> {
        let records = self.load_all()?;
        let before = records.len();
        let kept: Vec<TaskRecord> = records
            .into_iter()
            .filter(|record| record.id != id)
            .collect();
        debug!(before, after = kept.len(), "deleting record");
        self.write_all(&kept)
    }
}

#[tracing::instrument(skip(path))]
fn load_jsonl(path: &Path) -> anyhow::Result<Vec<TaskRecord>> {
    debug!(file = %path.display(), "loading jsonl");
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let record: TaskRecord = serde_json::from_str(trimmed)
            .with_context(|| format!("failed parsing {} line {}", path.display(), idx + 1))?;
        out.push(record);
    }

    debug!(count = out.len(), "loaded records from jsonl");
    Ok(out)
}

#[tracing::instrument(skip(path, records))]
fn save_jsonl_atomic(path: &Path, records: &[TaskRecord]) -> anyhow::Result<()> {
    debug!(file = %path.display(), count = records.len(), "saving jsonl atomically");

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    for record in records {
        let serialized = serde_json::to_string(record)?;
        writeln!(temp, "{serialized}")?;
    }
    temp.flush()?;

    temp.persist(path)
        .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

    Ok(())
}
