use crate::error::{Error, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::future::Future;

/// Folds `items` through an async `step`, one item at a time.
///
/// Each step finishes before the next one starts. The accumulator is moved
/// through the steps, and the first `Err` ends the fold; no later item is
/// visited and the error is returned once.
pub async fn fold_sequential<I, A, F, Fut>(items: I, init: A, step: F) -> Result<A>
where
    I: IntoIterator,
    F: FnMut(A, I::Item) -> Fut,
    Fut: Future<Output = Result<A>>,
{
    stream::iter(items)
        .map(Ok::<_, Error>)
        .try_fold(init, step)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_fold_preserves_order() {
        let out = fold_sequential(vec![1, 2, 3], Vec::new(), |mut acc, n| async move {
            acc.push(n * 10);
            Ok(acc)
        })
        .await
        .unwrap();
        assert_eq!(out, vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn test_fold_stops_at_first_error() {
        let visited = AtomicUsize::new(0);
        let result = fold_sequential(vec![1, 2, 3], 0, |acc, n| {
            visited.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 2 {
                    Err(Error::transport("boom"))
                } else {
                    Ok(acc + n)
                }
            }
        })
        .await;

        assert!(result.unwrap_err().is_transport());
        assert_eq!(visited.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fold_empty_returns_init() {
        let out = fold_sequential(Vec::<u8>::new(), 7, |acc, _| async move { Ok(acc) })
            .await
            .unwrap();
        assert_eq!(out, 7);
    }
}
