// ABOUTME: Background completion task — calls the model off the UI loop.
// ABOUTME: Each received message becomes one seeded request and one reply event.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::chat::seed::SeedContext;
use crate::llm::{CompletionError, CompletionService, GenerationConfig};

/// A user message bound for the model, tagged with the conversation epoch it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub epoch: u64,
    pub text: String,
}

/// Events sent from the completion task to the UI loop.
#[derive(Debug)]
pub enum ChatEvent {
    Completed {
        epoch: u64,
        result: Result<String, CompletionError>,
    },
}

/// Bundled parameters for the completion task.
pub struct CompletionWorkerParams {
    pub service: Arc<dyn CompletionService>,
    pub seed: SeedContext,
    pub generation: GenerationConfig,
}

/// Run until the request channel closes.
pub async fn run_completion_worker(
    params: CompletionWorkerParams,
    mut request_rx: mpsc::Receiver<ChatRequest>,
    event_tx: mpsc::Sender<ChatEvent>,
) {
    while let Some(ChatRequest { epoch, text }) = request_rx.recv().await {
        let request = params.seed.request(&text, &params.generation);
        let result = params.service.complete(&request).await;
        if event_tx
            .send(ChatEvent::Completed { epoch, result })
            .await
            .is_err()
        {
            break;
        }
    }
}
