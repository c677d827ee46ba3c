//! Email-enrichment-by-domain trait.

use async_trait::async_trait;

/// Resolves a contact email for a bare domain via an enrichment service.
///
/// Best-effort: `None` covers both "no address known" and provider failure
/// - enrichment is the last tier of the contact chain and never raises.
#[async_trait]
pub trait EmailEnricher: Send + Sync {
    async fn enrich(&self, domain: &str) -> Option<String>;
}
