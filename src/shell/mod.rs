// Terminal front end
pub mod commands;
pub mod render;

pub use commands::{Command, FavoriteTarget, ParseError, HELP};
pub use render::{render_dog, render_match, render_view};

use crate::core::{SearchController, SessionGateway};
use crate::services::DogService;
use std::sync::Arc;

/// Which surface is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Search,
}

/// Whether the input loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Line-driven front end over the session gateway and search controller
///
/// The search surface only exists while a session does: it is built on login
/// and dropped on logout, which also forgets favorites.
pub struct Shell {
    service: Arc<dyn DogService>,
    session: SessionGateway,
    search: Option<SearchController>,
}

impl Shell {
    pub fn new(service: Arc<dyn DogService>) -> Self {
        Self {
            service,
            session: SessionGateway::new(),
            search: None,
        }
    }

    pub fn route(&self) -> Route {
        if self.search.is_some() {
            Route::Search
        } else {
            Route::Login
        }
    }

    pub fn session(&self) -> &SessionGateway {
        &self.session
    }

    pub fn search(&self) -> Option<&SearchController> {
        self.search.as_ref()
    }

    pub fn prompt(&self) -> &'static str {
        match self.route() {
            Route::Login => "login> ",
            Route::Search => "search> ",
        }
    }

    /// Parse and run one line of input
    pub async fn handle_line(&mut self, line: &str) -> (Flow, String) {
        match line.parse::<Command>() {
            Ok(command) => self.execute(command).await,
            Err(ParseError::Empty) => (Flow::Continue, String::new()),
            Err(e) => (Flow::Continue, format!("{}\n", e)),
        }
    }

    pub async fn execute(&mut self, command: Command) -> (Flow, String) {
        if command == Command::Quit {
            return (Flow::Quit, String::new());
        }
        if command == Command::Help {
            return (Flow::Continue, format!("{}\n", HELP));
        }

        if command.needs_session() && self.search.is_none() {
            return (Flow::Continue, "Please log in first.\n".to_string());
        }

        let output = match command {
            Command::Login { name, email } => {
                if self.search.is_some() {
                    format!(
                        "Already logged in as {}.\n",
                        self.session.user().unwrap_or_default()
                    )
                } else {
                    self.login(&name, &email).await
                }
            }
            Command::Logout => self.logout().await,
            command => match self.search.as_mut() {
                Some(search) => run_search_command(search, command).await,
                None => String::new(),
            },
        };

        (Flow::Continue, output)
    }

    async fn login(&mut self, name: &str, email: &str) -> String {
        if let Err(e) = self.session.login(self.service.as_ref(), name, email).await {
            return format!("{}\n", e.user_message());
        }

        let mut search = SearchController::new(Arc::clone(&self.service));
        search.mount().await;
        let view = search.view();
        self.search = Some(search);

        format!(
            "Welcome, {}! {} breeds available.\n{}",
            self.session.user().unwrap_or_default(),
            view.breed_count,
            render_view(&view)
        )
    }

    async fn logout(&mut self) -> String {
        match self.session.logout(self.service.as_ref()).await {
            Ok(()) => {
                self.search = None;
                "Logged out.\n".to_string()
            }
            Err(_) => "Logout failed. Please try again.\n".to_string(),
        }
    }
}

async fn run_search_command(search: &mut SearchController, command: Command) -> String {
    match command {
        Command::Breed(breed) => search.set_breed(&breed).await,
        Command::Zip(zip) => search.set_zip(&zip).await,
        Command::Page(page) => search.set_page(page).await,
        Command::Next => {
            let page = search.query().page.saturating_add(1);
            search.set_page(page).await;
        }
        Command::Prev => {
            let page = search.query().page.saturating_sub(1);
            search.set_page(page).await;
        }
        Command::Breeds(prefix) => {
            let suggestions = search.breeds().suggestions(&prefix);
            if suggestions.is_empty() {
                return "No breed suggestions available.\n".to_string();
            }
            return format!("{}\n", suggestions.join(", "));
        }
        Command::Favorite(target) => {
            let id = match target {
                FavoriteTarget::Id(id) => id,
                FavoriteTarget::Index(index) => {
                    match index.checked_sub(1).and_then(|i| search.results().dogs.get(i)) {
                        Some(dog) => dog.id.clone(),
                        None => return format!("No dog at position {}.\n", index),
                    }
                }
            };
            return if search.toggle_favorite(&id) {
                format!("Added {} to favorites.\n", id)
            } else {
                format!("Removed {} from favorites.\n", id)
            };
        }
        Command::Match => {
            // Alerts are one-shot, like a browser alert box
            let output = match search.find_match().await {
                Ok(()) => search.view().matched.as_ref().map(render_match).unwrap_or_default(),
                Err(e) => format!("! {}\n", e.user_message()),
            };
            search.dismiss_alert();
            return output;
        }
        Command::Close => search.dismiss_match(),
        Command::Show => {}
        Command::Login { .. } | Command::Logout | Command::Help | Command::Quit => {}
    }

    render_view(&search.view())
}
