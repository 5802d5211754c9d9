use std::future::Future;

use tracing::debug;

use crate::api::error::ApiError;

/// Walk a numbered-page listing starting at page 1.
///
/// `fetch` is called with the page number and must return that page's
/// items. Collection stops at the first empty page or the first page
/// shorter than `per_page`, so a listing whose size is an exact multiple
/// of `per_page` costs one extra (empty) request. The first error aborts
/// the walk and nothing collected so far is returned.
pub async fn collect_pages<T, F, Fut>(per_page: usize, mut fetch: F) -> Result<Vec<T>, ApiError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ApiError>>,
{
    let mut items = Vec::new();
    let mut page = 1u32;

    loop {
        let batch = fetch(page).await?;
        let count = batch.len();
        debug!(page, count, "Fetched page");

        if count == 0 {
            break;
        }

        items.extend(batch);

        if count < per_page {
            break;
        }
        page += 1;
    }

    Ok(items)
}
