use crate::models::Article;
use crate::retry::{with_retry, RetryPolicy};
use crate::wiki::Encyclopedia;

/// Resolve `title` to a usable article.
///
/// Returns `None` for disambiguation pages (checked before anything else),
/// missing pages, empty extracts, and any fetch failure.
pub async fn fetch_article(
    encyclopedia: &dyn Encyclopedia,
    policy: &RetryPolicy,
    title: &str,
) -> Option<Article> {
    let result = with_retry(policy, "Wikipedia content fetch", None, move || async move {
        encyclopedia.fetch_page(title).await
    })
    .await;

    let page = match result {
        Ok(Some(page)) => page,
        Ok(None) => {
            tracing::debug!("No page for '{title}'");
            return None;
        }
        Err(e) => {
            tracing::error!("Wikipedia content fetch failed for '{title}': {e}");
            return None;
        }
    };

    if page.is_disambiguation() {
        tracing::info!("Skipping disambiguation page '{}'", page.title);
        return None;
    }

    if page.extract.is_empty() {
        tracing::debug!("Empty extract for '{}'", page.title);
        return None;
    }

    Some(Article {
        title: title.to_string(),
        body: page.extract,
    })
}
