use super::SqliteResolver;
use anyhow::{bail, Result};
use taglex_core::{TagId, TagStore, TenantId};
use tracing::info;

/// Delete a tag and its taggings
pub async fn execute(resolver: &SqliteResolver, tenant: i64, id: i64) -> Result<Vec<String>> {
    let store = resolver.store();
    let Some(tag) = store.get(TenantId(tenant), TagId(id)).await? else {
        bail!("No tag {} for tenant {}", id, tenant);
    };

    store.delete(TenantId(tenant), TagId(id)).await?;
    info!(tenant, id, name = %tag.name, "Deleted tag");
    Ok(vec![format!("Deleted {}\t{}", tag.id, tag.name)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{resolve, search, test_support::*};

    #[tokio::test]
    async fn test_delete_frees_the_name() {
        let resolver = memory_resolver(false);
        resolve::execute(&resolver, 1, &["rust".to_string()]).await.unwrap();
        tag_usage(&resolver, 1, "skills", 2);

        let lines = execute(&resolver, 1, 1).await.unwrap();
        assert_eq!(lines, vec!["Deleted 1\trust"]);
        assert!(search::execute(&resolver, 1, &["rust".to_string()])
            .await
            .unwrap()
            .is_empty());

        let recreated = resolve::execute(&resolver, 1, &["Rust".to_string()]).await.unwrap();
        assert_eq!(recreated, vec!["2\tRust\t0"]);
    }

    #[tokio::test]
    async fn test_delete_respects_tenant() {
        let resolver = memory_resolver(false);
        resolve::execute(&resolver, 1, &["rust".to_string()]).await.unwrap();

        assert!(execute(&resolver, 2, 1).await.is_err());
        assert!(execute(&resolver, 1, 1).await.is_ok());
        assert!(execute(&resolver, 1, 1).await.is_err());
    }
}
