//! CSV-backed ledger: one `leads_queue_*.csv` and one `audits_to_send_*.csv`
//! per client under a data directory.
//!
//! Full rewrites go through a same-directory temp file renamed into place,
//! so a crash mid-batch loses at most the unsaved tail and never corrupts
//! rows a previous save persisted.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::StoreResult;
use crate::ledger::LedgerStore;
use crate::types::audit::AuditRecord;
use crate::types::lead::LeadRecord;
use crate::types::ClientKey;

/// Durable CSV ledger rooted at a data directory.
#[derive(Debug, Clone)]
pub struct CsvLedger {
    root: PathBuf,
}

impl CsvLedger {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of a client's lead store.
    pub fn lead_path(&self, client: &ClientKey) -> PathBuf {
        self.root.join(format!("leads_queue_{}.csv", client.file_slug()))
    }

    /// Path of a client's audit store.
    pub fn audit_path(&self, client: &ClientKey) -> PathBuf {
        self.root.join(format!("audits_to_send_{}.csv", client.file_slug()))
    }
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> StoreResult<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut rows = Vec::new();
    for (idx, row) in reader.deserialize::<T>().enumerate() {
        match row {
            Ok(record) => rows.push(record),
            Err(err) => {
                // Row-scoped data error: skip, keep the batch alive.
                warn!(
                    target: "ledger",
                    path = %path.display(),
                    line = idx + 2,
                    %err,
                    "skipping malformed row"
                );
            }
        }
    }
    Ok(rows)
}

fn append_rows<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let is_new = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    if is_new {
        writer.write_record(headers)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn save_rows<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("csv.tmp");
    {
        let file = File::create(&tmp)?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(headers)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

#[async_trait]
impl LedgerStore for CsvLedger {
    async fn load_leads(&self, client: &ClientKey) -> StoreResult<Vec<LeadRecord>> {
        read_rows(&self.lead_path(client))
    }

    async fn append_leads(&self, client: &ClientKey, rows: &[LeadRecord]) -> StoreResult<()> {
        append_rows(&self.lead_path(client), LeadRecord::HEADERS, rows)
    }

    async fn save_leads(&self, client: &ClientKey, rows: &[LeadRecord]) -> StoreResult<()> {
        save_rows(&self.lead_path(client), LeadRecord::HEADERS, rows)
    }

    async fn load_audits(&self, client: &ClientKey) -> StoreResult<Vec<AuditRecord>> {
        read_rows(&self.audit_path(client))
    }

    async fn append_audits(&self, client: &ClientKey, rows: &[AuditRecord]) -> StoreResult<()> {
        append_rows(&self.audit_path(client), AuditRecord::HEADERS, rows)
    }

    async fn save_audits(&self, client: &ClientKey, rows: &[AuditRecord]) -> StoreResult<()> {
        save_rows(&self.audit_path(client), AuditRecord::HEADERS, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::audit::SocialLinks;
    use crate::types::lead::LeadStatus;

    fn ledger() -> (tempfile::TempDir, CsvLedger) {
        let dir = tempfile::tempdir().unwrap();
        let ledger = CsvLedger::new(dir.path());
        (dir, ledger)
    }

    #[tokio::test]
    async fn missing_store_loads_as_empty() {
        let (_dir, ledger) = ledger();
        let client = ClientKey::new("x");
        assert!(ledger.load_leads(&client).await.unwrap().is_empty());
        assert!(ledger.load_audits(&client).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_append_still_creates_store_with_header() {
        let (_dir, ledger) = ledger();
        let client = ClientKey::new("x");
        ledger.append_leads(&client, &[]).await.unwrap();

        let path = ledger.lead_path(&client);
        assert!(path.exists());
        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.trim(), "URL,Status");
        assert!(ledger.load_leads(&client).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_then_load_roundtrips() {
        let (_dir, ledger) = ledger();
        let client = ClientKey::new("x");
        ledger
            .append_leads(&client, &[LeadRecord::unscanned("https://newroof.com")])
            .await
            .unwrap();
        ledger
            .append_leads(&client, &[LeadRecord::unscanned("https://other.com")])
            .await
            .unwrap();

        let rows = ledger.load_leads(&client).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].url, "https://newroof.com");
        assert_eq!(rows[0].status, LeadStatus::Unscanned);

        // Header written exactly once across appends.
        let raw = std::fs::read_to_string(ledger.lead_path(&client)).unwrap();
        assert_eq!(raw.matches("URL,Status").count(), 1);
    }

    #[tokio::test]
    async fn save_rewrites_whole_store_and_leaves_no_temp_file() {
        let (dir, ledger) = ledger();
        let client = ClientKey::new("x");
        ledger
            .append_leads(
                &client,
                &[
                    LeadRecord::unscanned("https://a.com"),
                    LeadRecord::unscanned("https://b.com"),
                ],
            )
            .await
            .unwrap();

        let mut rows = ledger.load_leads(&client).await.unwrap();
        rows[0].status = LeadStatus::Processed;
        ledger.save_leads(&client, &rows).await.unwrap();

        let reloaded = ledger.load_leads(&client).await.unwrap();
        assert_eq!(reloaded[0].status, LeadStatus::Processed);
        assert_eq!(reloaded[1].status, LeadStatus::Unscanned);

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn malformed_rows_are_skipped_not_fatal() {
        let (_dir, ledger) = ledger();
        let client = ClientKey::new("x");
        let path = ledger.lead_path(&client);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            "URL,Status\nhttps://good.com,Unscanned\nhttps://bad.com,NotAStatus\nhttps://also-good.com,Processed\n",
        )
        .unwrap();

        let rows = ledger.load_leads(&client).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].url, "https://good.com");
        assert_eq!(rows[1].url, "https://also-good.com");
    }

    #[tokio::test]
    async fn audit_store_roundtrips_full_record() {
        let (_dir, ledger) = ledger();
        let client = ClientKey::new("x");
        let mut record = AuditRecord::from_analysis(
            "https://newroof.com",
            "No chat widget, losing an estimated $20,000 annually.",
            Some("info@newroof.com".into()),
            SocialLinks {
                facebook: Some("https://facebook.com/newroof".into()),
                ..Default::default()
            },
        );
        record.sent_date = chrono::NaiveDate::from_ymd_opt(2026, 8, 7);
        ledger.append_audits(&client, &[record.clone()]).await.unwrap();

        let rows = ledger.load_audits(&client).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], record);
    }

    #[tokio::test]
    async fn clients_do_not_share_stores() {
        let (_dir, ledger) = ledger();
        ledger
            .append_leads(&ClientKey::new("a"), &[LeadRecord::unscanned("https://a.com")])
            .await
            .unwrap();
        assert!(ledger.load_leads(&ClientKey::new("b")).await.unwrap().is_empty());
    }
}
