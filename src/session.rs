use log::{debug, error};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::acquisition::{resolve_upload_path, ContentResolver, ImageRef};
use crate::client::{FlaskClient, UploadReply};
use crate::error::LensError;
use crate::state::{AppState, Command, Message, Slot, Ticket};

/// Runs the network work an [`AppState`] asks for
///
/// Commands execute as spawned tasks that post their completion back as a
/// [`Message`]. A task whose ticket goes stale (because the user left the
/// screen it belongs to) is aborted; a completion that slips through anyway
/// is dropped by the state.
pub struct Session {
    client: Arc<FlaskClient>,
    content: Arc<dyn ContentResolver>,
    state: AppState,
    tasks: HashMap<Slot, (Ticket, JoinHandle<()>)>,
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
}

impl Session {
    pub fn new(client: FlaskClient, content: Arc<dyn ContentResolver>) -> Self {
        let state = AppState::new(client.config().clone());
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client: Arc::new(client),
            content,
            state,
            tasks: HashMap::new(),
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        self.state.take_notices()
    }

    /// Number of commands still running
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Apply a message and start whatever work it asks for
    pub fn dispatch(&mut self, message: Message) {
        if let Some(ticket) = message.ticket() {
            if matches!(self.tasks.get(&ticket.slot), Some((t, _)) if *t == ticket) {
                self.tasks.remove(&ticket.slot);
            }
        }
        if let Some(command) = self.state.update(message) {
            self.spawn(command);
        }
        self.abort_stale();
    }

    /// Wait for the next completion and apply it
    ///
    /// Returns `false` when nothing is in flight.
    pub async fn next_completion(&mut self) -> bool {
        if self.tasks.is_empty() {
            return false;
        }
        match self.rx.recv().await {
            Some(message) => {
                self.dispatch(message);
                true
            }
            None => false,
        }
    }

    /// Apply completions until nothing is in flight
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }

    /// Dispatch a message and wait for all work it started
    pub async fn run(&mut self, message: Message) {
        self.dispatch(message);
        self.settle().await;
    }

    fn spawn(&mut self, command: Command) {
        let ticket = command.ticket();
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();

        let handle = match command {
            Command::Upload { ticket, image } => {
                let content = Arc::clone(&self.content);
                tokio::spawn(async move {
                    let outcome = upload(&client, content.as_ref(), &image).await;
                    send(&tx, Message::UploadCompleted(ticket, outcome));
                })
            }
            Command::Search {
                ticket,
                ingredients,
            } => tokio::spawn(async move {
                let outcome = client.search_recipes(&ingredients).await;
                send(&tx, Message::SearchCompleted(ticket, outcome));
            }),
            Command::FetchDetail { ticket, recipe_id } => tokio::spawn(async move {
                let outcome = client.fetch_recipe_detail(recipe_id).await;
                send(&tx, Message::DetailCompleted(ticket, outcome));
            }),
        };

        if let Some((_, previous)) = self.tasks.insert(ticket.slot, (ticket, handle)) {
            previous.abort();
        }
    }

    fn abort_stale(&mut self) {
        let state = &self.state;
        self.tasks.retain(|slot, (ticket, handle)| {
            let current = state.is_current(*ticket);
            if !current {
                debug!("Cancelling stale {:?} request", slot);
                handle.abort();
            }
            current
        });
    }
}

/// Resolve the image and upload it; no request is made when it does not
/// resolve to a local file
async fn upload(
    client: &FlaskClient,
    content: &dyn ContentResolver,
    image: &ImageRef,
) -> Result<UploadReply, LensError> {
    let path = resolve_upload_path(Some(image), content)
        .await
        .ok_or(LensError::NothingToUpload)?;
    client.upload_image(&path).await
}

fn send(tx: &mpsc::UnboundedSender<Message>, message: Message) {
    if tx.send(message).is_err() {
        error!("Session closed before a completion could be delivered");
    }
}
