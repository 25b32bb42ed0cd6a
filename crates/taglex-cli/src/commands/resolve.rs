use super::{format_tag, SqliteResolver};
use anyhow::Result;
use taglex_core::TenantId;
use tracing::info;

/// Resolve `names`, creating missing tags. One line per input name.
pub async fn execute(resolver: &SqliteResolver, tenant: i64, names: &[String]) -> Result<Vec<String>> {
    let tags = resolver.resolve_or_create(TenantId(tenant), names).await?;
    info!(tenant, requested = names.len(), "Resolved tags");
    Ok(tags.iter().map(format_tag).collect())
}
