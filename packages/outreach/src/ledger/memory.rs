//! In-memory ledger for tests and development.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::ledger::LedgerStore;
use crate::types::audit::AuditRecord;
use crate::types::lead::LeadRecord;
use crate::types::ClientKey;

/// Ledger that keeps everything in process memory.
///
/// Mirrors the CSV ledger's observable behavior, including "append creates
/// the store": an empty append registers the store so existence checks see
/// it.
#[derive(Default)]
pub struct MemoryLedger {
    leads: RwLock<HashMap<String, Vec<LeadRecord>>>,
    audits: RwLock<HashMap<String, Vec<AuditRecord>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a lead store has been created for this client.
    pub fn lead_store_exists(&self, client: &ClientKey) -> bool {
        self.leads.read().unwrap().contains_key(client.as_str())
    }

    /// Whether an audit store has been created for this client.
    pub fn audit_store_exists(&self, client: &ClientKey) -> bool {
        self.audits.read().unwrap().contains_key(client.as_str())
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn load_leads(&self, client: &ClientKey) -> StoreResult<Vec<LeadRecord>> {
        Ok(self
            .leads
            .read()
            .unwrap()
            .get(client.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn append_leads(&self, client: &ClientKey, rows: &[LeadRecord]) -> StoreResult<()> {
        self.leads
            .write()
            .unwrap()
            .entry(client.as_str().to_string())
            .or_default()
            .extend_from_slice(rows);
        Ok(())
    }

    async fn save_leads(&self, client: &ClientKey, rows: &[LeadRecord]) -> StoreResult<()> {
        self.leads
            .write()
            .unwrap()
            .insert(client.as_str().to_string(), rows.to_vec());
        Ok(())
    }

    async fn load_audits(&self, client: &ClientKey) -> StoreResult<Vec<AuditRecord>> {
        Ok(self
            .audits
            .read()
            .unwrap()
            .get(client.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn append_audits(&self, client: &ClientKey, rows: &[AuditRecord]) -> StoreResult<()> {
        self.audits
            .write()
            .unwrap()
            .entry(client.as_str().to_string())
            .or_default()
            .extend_from_slice(rows);
        Ok(())
    }

    async fn save_audits(&self, client: &ClientKey, rows: &[AuditRecord]) -> StoreResult<()> {
        self.audits
            .write()
            .unwrap()
            .insert(client.as_str().to_string(), rows.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_append_registers_the_store() {
        let ledger = MemoryLedger::new();
        let client = ClientKey::new("x");
        assert!(!ledger.lead_store_exists(&client));
        ledger.append_leads(&client, &[]).await.unwrap();
        assert!(ledger.lead_store_exists(&client));
        assert!(ledger.load_leads(&client).await.unwrap().is_empty());
    }
}
