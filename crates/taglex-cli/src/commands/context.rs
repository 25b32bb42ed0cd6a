use super::{format_tag, SqliteResolver};
use anyhow::Result;
use taglex_core::{TagQuery, TenantId};

/// Tags attached in `context`, most used first
pub async fn execute(resolver: &SqliteResolver, tenant: i64, context: &str) -> Result<Vec<String>> {
    let tags = TagQuery::new(TenantId(tenant))
        .for_context(context)
        .most_used()
        .fetch(resolver.store().as_ref())
        .await?;
    Ok(tags.iter().map(format_tag).collect())
}
