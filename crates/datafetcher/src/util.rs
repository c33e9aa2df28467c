use futures::future::join_all;
use std::future::Future;

/// Outcome of a group of independent fallible tasks
#[derive(Debug)]
pub struct Settled<T, E> {
    pub ok: Vec<T>,
    pub errors: Vec<E>,
}

impl<T, E> Settled<T, E> {
    /// The successes, or every failure if there was at least one
    pub fn into_result(self) -> Result<Vec<T>, Vec<E>> {
        if self.errors.is_empty() {
            Ok(self.ok)
        } else {
            Err(self.errors)
        }
    }
}

/// Drives every future to completion and partitions the outcomes.
///
/// One failing task never cancels the others, and successes keep the order
/// in which their futures were given.
pub async fn settle<I, F, T, E>(futures: I) -> Settled<T, E>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    let mut settled = Settled {
        ok: Vec::new(),
        errors: Vec::new(),
    };

    for outcome in join_all(futures).await {
        match outcome {
            Ok(value) => settled.ok.push(value),
            Err(e) => settled.errors.push(e),
        }
    }

    settled
}
