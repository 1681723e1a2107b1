//! Application state and its single update entry point.
//!
//! Screens never mutate state directly: they send a [`Message`] to
//! [`AppState::update`], which may answer with a [`Command`] describing
//! network work to run. Each command carries a [`Ticket`]; its completion is
//! applied only while that ticket is still current.

use log::{debug, info, warn};
use std::collections::VecDeque;

use crate::acquisition::ImageRef;
use crate::browse::{DetailTarget, Favorites};
use crate::client::UploadReply;
use crate::error::LensError;
use crate::extraction::AnalysisResult;
use crate::ingredients::IngredientList;
use crate::model::{RecipeDetail, RecipeSummary};
use crate::navigation::{Route, Tab};
use crate::LensConfig;

/// Message shown when a recipe detail cannot be displayed
pub const DETAIL_UNAVAILABLE: &str = "The recipe could not be loaded.";

/// Kinds of request that can be in flight, one of each at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Upload,
    Search,
    Detail,
}

impl Slot {
    fn index(self) -> usize {
        match self {
            Slot::Upload => 0,
            Slot::Search => 1,
            Slot::Detail => 2,
        }
    }
}

/// Stamp on a dispatched command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub slot: Slot,
    seq: u64,
}

/// Network work requested by an update
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Upload { ticket: Ticket, image: ImageRef },
    Search { ticket: Ticket, ingredients: String },
    FetchDetail { ticket: Ticket, recipe_id: i64 },
}

impl Command {
    pub fn ticket(&self) -> Ticket {
        match self {
            Command::Upload { ticket, .. }
            | Command::Search { ticket, .. }
            | Command::FetchDetail { ticket, .. } => *ticket,
        }
    }
}

/// What the detail screen shows
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailState {
    #[default]
    Idle,
    Loading,
    Ready(Box<RecipeDetail>),
    Unavailable,
}

impl DetailState {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            DetailState::Unavailable => Some(DETAIL_UNAVAILABLE),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum Message {
    Navigate(Route),
    Back,
    SelectTab(Tab),
    ImageChosen(ImageRef),
    AnalyzeRequested,
    UploadCompleted(Ticket, Result<UploadReply, LensError>),
    AddIngredient(String),
    RecommendRequested,
    SearchCompleted(Ticket, Result<Vec<RecipeSummary>, LensError>),
    ToggleFavorite(RecipeSummary),
    SelectRecipe(RecipeSummary),
    DetailCompleted(Ticket, Result<Option<RecipeDetail>, LensError>),
}

impl Message {
    /// Ticket of a completion message
    pub fn ticket(&self) -> Option<Ticket> {
        match self {
            Message::UploadCompleted(ticket, _)
            | Message::SearchCompleted(ticket, _)
            | Message::DetailCompleted(ticket, _) => Some(*ticket),
            _ => None,
        }
    }
}

/// Everything the screens show, owned in one place
#[derive(Debug, Clone, Default)]
pub struct AppState {
    history: Vec<Route>,
    route: Route,
    pub user_id: String,
    pub favorites: Favorites,
    pub loading: bool,
    pub image: Option<ImageRef>,
    /// Image of the upload in flight; `image` may change before it completes
    uploading: Option<ImageRef>,
    pub upload_response: Option<String>,
    pub analysis: Option<AnalysisResult>,
    pub ingredients: IngredientList,
    pub recipes: Vec<RecipeSummary>,
    pub detail: DetailState,
    notices: VecDeque<String>,
    seqs: [u64; 3],
    config: LensConfig,
}

impl AppState {
    pub fn new(config: LensConfig) -> Self {
        Self {
            user_id: "guest".to_string(),
            config,
            ..Default::default()
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn config(&self) -> &LensConfig {
        &self.config
    }

    /// Whether a completion stamped with `ticket` would still be applied
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.seqs[ticket.slot.index()] == ticket.seq
    }

    /// Notices raised since the last call, oldest first
    pub fn take_notices(&mut self) -> Vec<String> {
        self.notices.drain(..).collect()
    }

    /// Apply a message, returning the network work it asks for
    pub fn update(&mut self, message: Message) -> Option<Command> {
        match message {
            Message::Navigate(route) => self.navigate(route),
            Message::Back => self.back(),
            Message::SelectTab(tab) => {
                let route = tab.route(&self.user_id);
                self.navigate(route)
            }
            Message::ImageChosen(image) => {
                debug!("Image chosen: {}", image);
                self.image = Some(image);
                None
            }
            Message::AnalyzeRequested => self.analyze(),
            Message::UploadCompleted(ticket, outcome) => {
                if self.accept(ticket) {
                    self.loading = false;
                    self.upload_completed(outcome);
                }
                None
            }
            Message::AddIngredient(token) => {
                self.ingredients.push(token);
                None
            }
            Message::RecommendRequested => self.navigate(Route::RecipeList),
            Message::SearchCompleted(ticket, outcome) => {
                if self.accept(ticket) {
                    self.loading = false;
                    self.search_completed(outcome);
                }
                None
            }
            Message::ToggleFavorite(recipe) => {
                let now = self.favorites.toggle(&recipe);
                debug!("'{}' favorite: {}", recipe.title, now);
                None
            }
            Message::SelectRecipe(recipe) => {
                let route = DetailTarget::for_recipe(&recipe).route();
                self.navigate(route)
            }
            Message::DetailCompleted(ticket, outcome) => {
                if self.accept(ticket) {
                    self.detail_completed(outcome);
                }
                None
            }
        }
    }

    fn navigate(&mut self, route: Route) -> Option<Command> {
        self.leave();
        let previous = std::mem::replace(&mut self.route, route);
        self.history.push(previous);
        self.enter()
    }

    fn back(&mut self) -> Option<Command> {
        let previous = self.history.pop()?;
        self.leave();
        self.route = previous;
        self.enter()
    }

    /// Invalidate work that belongs to the screen being left
    fn leave(&mut self) {
        let slot = match self.route {
            Route::Home => Slot::Upload,
            Route::RecipeList => Slot::Search,
            Route::RecipeInfo { .. } => Slot::Detail,
            _ => return,
        };
        self.invalidate(slot);
    }

    /// Start the work a screen does when it opens
    fn enter(&mut self) -> Option<Command> {
        match self.route.clone() {
            Route::RecipeList => {
                if self.loading {
                    self.notice(LensError::Busy.notice());
                    return None;
                }
                let ingredients = self.config.search_query(&self.ingredients.to_csv()).to_string();
                self.loading = true;
                Some(Command::Search {
                    ticket: self.issue(Slot::Search),
                    ingredients,
                })
            }
            Route::RecipeInfo { id } => {
                self.detail = DetailState::Loading;
                Some(Command::FetchDetail {
                    ticket: self.issue(Slot::Detail),
                    recipe_id: id,
                })
            }
            _ => None,
        }
    }

    fn analyze(&mut self) -> Option<Command> {
        if self.loading {
            self.notice(LensError::Busy.notice());
            return None;
        }
        let Some(image) = self.image.clone() else {
            self.notice(LensError::NothingToUpload.notice());
            return None;
        };
        self.loading = true;
        self.uploading = Some(image.clone());
        Some(Command::Upload {
            ticket: self.issue(Slot::Upload),
            image,
        })
    }

    fn upload_completed(&mut self, outcome: Result<UploadReply, LensError>) {
        let uploaded = self.uploading.take();
        let reply = match outcome {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Upload error: {}", e);
                self.notice(format!("Upload Error: {}", e.notice()));
                self.upload_response = None;
                return;
            }
        };

        if !reply.is_success() {
            self.notice(format!("Upload Failed: {}", reply.body));
        }
        match AnalysisResult::parse(&reply.body, &self.config) {
            Ok(analysis) => {
                info!("Detected {} ingredients", analysis.ingredients.len());
                self.ingredients = IngredientList::from_tokens(analysis.ingredients.clone());
                self.analysis = Some(analysis);
            }
            Err(e) => {
                warn!("Could not read upload response: {}", e);
                self.notice(e.notice());
                self.ingredients.clear();
                self.analysis = None;
            }
        }
        self.upload_response = Some(reply.body);

        let image_ref = uploaded
            .map(|i| i.as_str().to_string())
            .unwrap_or_default();
        self.navigate(Route::Analysis { image_ref });
    }

    fn search_completed(&mut self, outcome: Result<Vec<RecipeSummary>, LensError>) {
        match outcome {
            Ok(recipes) => {
                if recipes.is_empty() {
                    self.notice(LensError::EmptyResult.notice());
                }
                self.recipes = recipes;
            }
            Err(e) => {
                warn!("Recipe search failed: {}", e);
                self.notice(e.notice());
                self.notice("Failed to load recipes".to_string());
            }
        }
    }

    fn detail_completed(&mut self, outcome: Result<Option<RecipeDetail>, LensError>) {
        self.detail = match outcome {
            Ok(Some(detail)) => DetailState::Ready(Box::new(detail)),
            Ok(None) => {
                debug!("Empty detail response");
                DetailState::Unavailable
            }
            Err(e) => {
                warn!("Detail fetch failed: {}", e);
                DetailState::Unavailable
            }
        };
        if let Some(message) = self.detail.message() {
            self.notice(message.to_string());
        }
    }

    fn issue(&mut self, slot: Slot) -> Ticket {
        let seq = &mut self.seqs[slot.index()];
        *seq += 1;
        Ticket { slot, seq: *seq }
    }

    fn invalidate(&mut self, slot: Slot) {
        self.seqs[slot.index()] += 1;
        if matches!(slot, Slot::Upload | Slot::Search) {
            self.loading = false;
        }
        if slot == Slot::Upload {
            self.uploading = None;
        }
    }

    fn accept(&self, ticket: Ticket) -> bool {
        let current = self.is_current(ticket);
        if !current {
            debug!("Dropping stale {:?} completion", ticket.slot);
        }
        current
    }

    fn notice(&mut self, message: String) {
        self.notices.push_back(message);
    }
}
