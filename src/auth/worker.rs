// ABOUTME: Background auth task — runs API calls off the UI loop.
// ABOUTME: Receives credentials over a channel and sends each outcome back.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::auth::api::{AuthApi, AuthError, AuthResponse};
use crate::auth::flow::Credentials;

/// Result of one submission, delivered to the UI loop.
#[derive(Debug)]
pub enum AuthEvent {
    Completed(Result<AuthResponse, AuthError>),
}

/// Serve auth requests until the request channel closes.
pub async fn run_auth_worker(
    api: Arc<dyn AuthApi>,
    mut request_rx: mpsc::Receiver<Credentials>,
    event_tx: mpsc::Sender<AuthEvent>,
) {
    while let Some(credentials) = request_rx.recv().await {
        let result = credentials.call(api.as_ref()).await;
        if event_tx.send(AuthEvent::Completed(result)).await.is_err() {
            break;
        }
    }
}
