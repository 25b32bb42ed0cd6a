use super::{format_tag, SqliteResolver};
use anyhow::Result;
use taglex_core::{TagQuery, TenantId};

pub async fn execute(
    resolver: &SqliteResolver,
    tenant: i64,
    least: bool,
    limit: usize,
) -> Result<Vec<String>> {
    let query = TagQuery::new(TenantId(tenant)).limit(limit);
    let query = if least { query.least_used() } else { query.most_used() };
    let tags = query.fetch(resolver.store().as_ref()).await?;
    Ok(tags.iter().map(format_tag).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{resolve, test_support::*};

    #[tokio::test]
    async fn test_usage_ordering() {
        let resolver = memory_resolver(false);
        let names = ["rust", "go", "zig"].map(String::from);
        resolve::execute(&resolver, 1, &names).await.unwrap();
        tag_usage(&resolver, 1, "skills", 3);
        tag_usage(&resolver, 3, "skills", 1);

        let most = execute(&resolver, 1, false, 2).await.unwrap();
        assert_eq!(most, vec!["1\trust\t3", "3\tzig\t1"]);

        let least = execute(&resolver, 1, true, 20).await.unwrap();
        assert_eq!(least, vec!["2\tgo\t0", "3\tzig\t1", "1\trust\t3"]);
    }
}
