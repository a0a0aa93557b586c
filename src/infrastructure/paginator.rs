//! Generic paged-fetch loop
//!
//! Search endpoints share the same pagination contract: 1-indexed pages of
//! up to [`PAGE_SIZE`] results, capped at [`MAX_RESULTS`] total. The caller
//! supplies a closure that fetches one page and extracts the result array;
//! the loop accumulates until a short page or the page cap. Any single page
//! failure aborts the whole run.

use std::future::Future;

use crate::application::errors::ReportError;

/// Results requested per page.
pub const PAGE_SIZE: u32 = 500;
/// Hard cap on accumulated results across all pages.
pub const MAX_RESULTS: u32 = 10_000;
/// Maximum number of pages ever fetched.
pub const MAX_PAGE: u32 = MAX_RESULTS / PAGE_SIZE;

/// Repeatedly fetch pages, accumulating extracted results.
///
/// Stops after the first page that returns fewer than [`PAGE_SIZE`] results,
/// or once [`MAX_PAGE`] pages have been fetched, whichever comes first.
pub async fn fetch_all_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, ReportError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ReportError>>,
{
    let mut results = Vec::new();
    let mut page = 1;
    loop {
        let batch = fetch_page(page).await?;
        let short_page = (batch.len() as u32) < PAGE_SIZE;
        tracing::debug!(page, count = batch.len(), "fetched page");
        results.extend(batch);
        if short_page || page >= MAX_PAGE {
            return Ok(results);
        }
        page += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn stops_after_first_short_page() {
        let calls = Cell::new(0u32);
        let results = fetch_all_pages(|page| {
            calls.set(calls.get() + 1);
            let len = if page < 3 { PAGE_SIZE as usize } else { 10 };
            async move { Ok(vec![0u8; len]) }
        })
        .await
        .unwrap();

        assert_eq!(calls.get(), 3);
        assert_eq!(results.len(), 2 * PAGE_SIZE as usize + 10);
    }

    #[tokio::test]
    async fn single_short_page_fetches_once() {
        let calls = Cell::new(0u32);
        let results = fetch_all_pages(|_page| {
            calls.set(calls.get() + 1);
            async move { Ok(vec![1u8, 2, 3]) }
        })
        .await
        .unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn never_exceeds_the_page_cap() {
        let calls = Cell::new(0u32);
        let results = fetch_all_pages(|_page| {
            calls.set(calls.get() + 1);
            // Server claims full pages forever.
            async move { Ok(vec![0u8; PAGE_SIZE as usize]) }
        })
        .await
        .unwrap();

        assert_eq!(calls.get(), MAX_PAGE);
        assert_eq!(results.len(), MAX_RESULTS as usize);
    }

    #[tokio::test]
    async fn page_failure_aborts_immediately() {
        let calls = Cell::new(0u32);
        let result: Result<Vec<u8>, _> = fetch_all_pages(|page| {
            calls.set(calls.get() + 1);
            async move {
                if page == 2 {
                    Err(ReportError::DataIntegrity("boom".to_string()))
                } else {
                    Ok(vec![0u8; PAGE_SIZE as usize])
                }
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 2);
    }
}
