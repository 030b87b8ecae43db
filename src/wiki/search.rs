use crate::retry::{with_retry, RetryPolicy};
use crate::wiki::Encyclopedia;

/// Default number of titles requested per search.
pub const DEFAULT_LIMIT: usize = 5;

/// Search for article titles matching `term`, at most `limit` of them.
///
/// Rate limits are retried under `policy`; every other failure, and running
/// out of attempts, yields an empty list.
pub async fn search_titles(
    encyclopedia: &dyn Encyclopedia,
    policy: &RetryPolicy,
    term: &str,
    limit: usize,
) -> Vec<String> {
    let result = with_retry(policy, "Wikipedia search", Vec::new(), move || async move {
        encyclopedia.search(term, limit).await
    })
    .await;

    match result {
        Ok(mut titles) => {
            titles.truncate(limit);
            titles
        }
        Err(e) => {
            tracing::error!("Wikipedia search failed for '{term}': {e}");
            Vec::new()
        }
    }
}
