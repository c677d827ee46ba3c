//! The durable per-client record stores ("the ledger").
//!
//! Two named stores exist per client: the lead queue and the audit store.
//! They are the single source of truth for deduplication and status - every
//! pipeline stage reads and writes through this seam, which is what makes
//! the storage engine swappable without touching pipeline logic.

pub mod csv_store;
pub mod memory;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::audit::AuditRecord;
use crate::types::lead::LeadRecord;
use crate::types::ClientKey;

/// Load/append/save over the two per-client stores.
///
/// Contract, for every implementation:
/// - a missing store loads as empty, never as an error;
/// - a malformed row is skipped with a warning, never fatal;
/// - `append_*` creates the store (header included) when absent, even for
///   an empty batch - downstream stages must never trip over a missing
///   store after discovery ran;
/// - `save_*` is a full rewrite that a crash can only lose whole, never
///   corrupt rows that a previous call persisted.
///
/// Concurrent runs against the same client key are out of scope: at most
/// one pipeline run per client at a time.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn load_leads(&self, client: &ClientKey) -> StoreResult<Vec<LeadRecord>>;
    async fn append_leads(&self, client: &ClientKey, rows: &[LeadRecord]) -> StoreResult<()>;
    async fn save_leads(&self, client: &ClientKey, rows: &[LeadRecord]) -> StoreResult<()>;

    async fn load_audits(&self, client: &ClientKey) -> StoreResult<Vec<AuditRecord>>;
    async fn append_audits(&self, client: &ClientKey, rows: &[AuditRecord]) -> StoreResult<()>;
    async fn save_audits(&self, client: &ClientKey, rows: &[AuditRecord]) -> StoreResult<()>;
}

pub use csv_store::CsvLedger;
pub use memory::MemoryLedger;
