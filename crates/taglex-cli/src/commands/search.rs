use super::{format_tag, SqliteResolver};
use anyhow::Result;
use taglex_core::{TagQuery, TenantId};

/// Tags whose names contain any of `text`, matched literally
pub async fn execute(resolver: &SqliteResolver, tenant: i64, text: &[String]) -> Result<Vec<String>> {
    let query = match text {
        [single] => TagQuery::new(TenantId(tenant)).named_like(single.as_str()),
        many => TagQuery::new(TenantId(tenant)).named_like_any(many.iter().cloned()),
    };
    let tags = query.fetch(resolver.store().as_ref()).await?;
    Ok(tags.iter().map(format_tag).collect())
}
