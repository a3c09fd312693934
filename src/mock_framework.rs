//! # Mock Framework
//!
//! Utilities for testing code that talks to a [`ResourceActor`](crate::actor_framework::ResourceActor)
//! without running one.
//!
//! Use [`create_mock_client`] to get a client and the receiving end of its channel.
//! Then use [`expect_get`] or [`expect_action`] to assert each request and script
//! the reply.

use tokio::sync::{mpsc, oneshot};

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};

/// Creates a mock client and a receiver for asserting requests.
///
/// The test plays the actor: every request the code under test sends arrives on
/// `receiver`, and the test decides what to answer, or whether to answer at all.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, oneshot::Sender<Result<T::ActionResult, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, CatalogAction, CatalogActionResult, CatalogItem, LocalCatalog};
    use crate::domain::Stock;
    use crate::error::CatalogError;

    #[tokio::test]
    async fn test_mock_client() {
        let (inner, mut receiver) = create_mock_client::<CatalogItem>(10);
        let catalog = LocalCatalog::new(inner);

        let task = tokio::spawn(async move { catalog.stock(7).await });

        let (id, action, responder) = expect_action(&mut receiver).await.expect("Expected Action request");
        assert_eq!(id, 7);
        assert!(matches!(action, CatalogAction::CheckStock));
        responder.send(Ok(CatalogActionResult::StockLevel(4))).unwrap();

        assert_eq!(task.await.unwrap(), Ok(Stock { amount: 4 }));
    }

    #[tokio::test]
    async fn test_dropped_responder_is_reported() {
        let (inner, mut receiver) = create_mock_client::<CatalogItem>(10);
        let catalog = LocalCatalog::new(inner);

        let task = tokio::spawn(async move { catalog.product(3).await });

        let (_id, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        drop(responder);

        assert!(matches!(task.await.unwrap(), Err(CatalogError::Unavailable(_))));
    }
}
