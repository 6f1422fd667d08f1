//! Paginated fetching
//!
//! [`fetch_pages`] turns a cursor-driven query into a lazy stream of pages.
//! The next page is only requested once the consumer pulls it, and each page
//! query is retried under the configured [`RetryPolicy`].

use crate::adapters::service::{PageRequest, QueryService};
use crate::core::hooks::ExportHooks;
use crate::core::retry::RetryPolicy;
use crate::domain::{DumpError, Page, Result};
use futures::stream::{self, BoxStream, StreamExt};

enum FetchState {
    Next(PageRequest),
    Done,
}

/// Fetch one page, retrying transient failures
///
/// # Errors
///
/// Returns the first non-retryable error, or the last error once a bounded
/// policy runs out of attempts.
pub async fn fetch_page(
    service: &dyn QueryService,
    request: &PageRequest,
    retry: &RetryPolicy,
    hooks: &dyn ExportHooks,
) -> Result<Page> {
    retry
        .run(
            || service.fetch_page(request),
            |attempt, error, delay| {
                hooks.on_failed_attempt(&request.collection.id, attempt, error, delay)
            },
        )
        .await
}

/// Stream the pages of one collection in cursor order
///
/// `request.after` is the starting cursor, normally `None`. The stream ends
/// after the first page without a cursor, or after the first error.
pub fn fetch_pages<'a>(
    service: &'a dyn QueryService,
    request: PageRequest,
    retry: &'a RetryPolicy,
    hooks: &'a dyn ExportHooks,
) -> BoxStream<'a, Result<Page>> {
    stream::try_unfold(FetchState::Next(request), move |state| async move {
        let mut request = match state {
            FetchState::Next(request) => request,
            FetchState::Done => return Ok::<_, DumpError>(None),
        };

        let page = fetch_page(service, &request, retry, hooks).await?;
        tracing::debug!(
            collection = %request.collection.id,
            records = page.len(),
            has_next = page.has_next(),
            "Fetched page"
        );

        let next = match &page.after {
            Some(cursor) => {
                request.after = Some(cursor.clone());
                FetchState::Next(request)
            }
            None => FetchState::Done,
        };
        Ok(Some((page, next)))
    })
    .boxed()
}
