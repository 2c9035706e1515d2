// ABOUTME: App orchestrator — wires together session storage, API clients, workers, and the TUI.
// ABOUTME: Sets up subsystems then runs the crossterm event loop until the user quits.

use std::sync::Arc;

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use crate::auth::worker::{AuthEvent, run_auth_worker};
use crate::auth::{AuthApi, AuthError, Credentials, HttpAuthApi};
use crate::chat::{
    ChatEvent, ChatRequest, CompletionWorkerParams, SeedContext, run_completion_worker,
};
use crate::config::Config;
use crate::llm::{CompletionError, CompletionService, GeminiClient, GenerationConfig};
use crate::router::Route;
use crate::session::{FileTokenStorage, SessionStore};
use crate::tui::input::{InputResult, handle_key};
use crate::tui::state::TuiState;
use crate::tui::ui;

/// Channel ends the UI loop uses to talk to the background workers.
pub struct WorkerChannels {
    pub auth_tx: mpsc::Sender<Credentials>,
    pub auth_rx: mpsc::Receiver<AuthEvent>,
    pub chat_tx: mpsc::Sender<ChatRequest>,
    pub chat_rx: mpsc::Receiver<ChatEvent>,
}

/// Top-level application that orchestrates all subsystems.
pub struct App {
    config: Config,
    initial_route: Route,
}

impl App {
    /// Create a new app with the given configuration. It opens at `/chat`.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            initial_route: Route::Chat,
        }
    }

    /// Open at `route` instead; the guard still applies.
    pub fn with_initial_route(mut self, route: Route) -> Self {
        self.initial_route = route;
        self
    }

    pub fn initial_route(&self) -> Route {
        self.initial_route
    }

    /// Open the session store over the configured token file.
    pub fn open_session(config: &Config) -> SessionStore {
        let storage = FileTokenStorage::new(config.session.token_path());
        SessionStore::init(Box::new(storage))
    }

    /// Run the application: set up subsystems, launch the workers, and drive the TUI.
    pub async fn run(self) -> anyhow::Result<()> {
        let session = Self::open_session(&self.config);

        let auth_api: Arc<dyn AuthApi> = Arc::new(HttpAuthApi::new(&self.config.api)?);
        let service: Arc<dyn CompletionService> =
            Arc::new(GeminiClient::from_env(&self.config.llm)?);
        let model = service.model_id().to_string();

        let mut seed = SeedContext::new();
        seed.load_overrides(&Config::home_dir());

        // Create channels for worker <-> TUI communication.
        let (auth_tx, auth_req_rx) = mpsc::channel::<Credentials>(4);
        let (auth_evt_tx, auth_rx) = mpsc::channel::<AuthEvent>(4);
        let (chat_tx, chat_req_rx) = mpsc::channel::<ChatRequest>(4);
        let (chat_evt_tx, chat_rx) = mpsc::channel::<ChatEvent>(4);

        let auth_handle = tokio::spawn(run_auth_worker(auth_api, auth_req_rx, auth_evt_tx));
        let chat_handle = tokio::spawn(run_completion_worker(
            CompletionWorkerParams {
                service,
                seed,
                generation: GenerationConfig::from(&self.config.llm),
            },
            chat_req_rx,
            chat_evt_tx,
        ));

        // The guard decides from the hydrated session where we really land.
        let mut state = TuiState::new(session, self.initial_route, model);
        tracing::info!("starting at {}", state.route().path());

        let mut channels = WorkerChannels {
            auth_tx,
            auth_rx,
            chat_tx,
            chat_rx,
        };

        let mut terminal = ratatui::init();
        let result = event_loop(&mut terminal, &mut state, &mut channels).await;
        ratatui::restore();

        // Closing the request channels stops the workers. Any in-flight request
        // is abandoned rather than awaited.
        drop(channels);
        auth_handle.abort();
        chat_handle.abort();

        result
    }
}

/// Draw, wait for the next terminal or worker event, apply it, repeat.
pub async fn event_loop(
    terminal: &mut DefaultTerminal,
    state: &mut TuiState,
    channels: &mut WorkerChannels,
) -> anyhow::Result<()> {
    let mut events = EventStream::new();

    while !state.should_quit {
        terminal.draw(|frame| ui::render(frame, state))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                // Only handle Press events (not Release or Repeat)
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    dispatch_key(state, channels, key);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Some(event) = channels.auth_rx.recv() => state.apply_auth_event(event),
            Some(event) = channels.chat_rx.recv() => state.apply_chat_event(event),
        }
    }

    Ok(())
}

/// Apply a key press and forward any resulting request to its worker.
pub fn dispatch_key(state: &mut TuiState, channels: &WorkerChannels, key: KeyEvent) {
    match handle_key(state, key) {
        InputResult::None => {}
        InputResult::Quit => state.should_quit = true,
        InputResult::SubmitAuth(credentials) => {
            if let Err(e) = channels.auth_tx.try_send(credentials) {
                tracing::error!("auth worker unavailable: {}", e);
                state.apply_auth_event(AuthEvent::Completed(Err(AuthError::Network(
                    "request could not be sent".to_string(),
                ))));
            }
        }
        InputResult::Send(request) => {
            let epoch = request.epoch;
            if let Err(e) = channels.chat_tx.try_send(request) {
                state.apply_chat_event(ChatEvent::Completed {
                    epoch,
                    result: Err(CompletionError::Network(format!(
                        "completion worker unavailable: {}",
                        e
                    ))),
                });
            }
        }
    }
}
