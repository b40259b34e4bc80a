use std::str::FromStr;
use thiserror::Error;

/// Which dog a `fav` command refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteTarget {
    /// 1-based position in the listed results
    Index(usize),
    Id(String),
}

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { name: String, email: String },
    Logout,
    Breed(String),
    Breeds(String),
    Zip(String),
    Page(u32),
    Next,
    Prev,
    Favorite(FavoriteTarget),
    Match,
    Close,
    Show,
    Help,
    Quit,
}

impl Command {
    /// Commands that only make sense on the search surface
    pub fn needs_session(&self) -> bool {
        !matches!(
            self,
            Command::Login { .. } | Command::Help | Command::Quit
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty input")]
    Empty,

    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("'{0}' is not a valid page number")]
    InvalidPage(String),
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::Empty);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "login" => Ok(parse_login(rest)),
            "logout" => Ok(Command::Logout),
            "breed" | "search" => Ok(Command::Breed(rest.to_string())),
            "breeds" => Ok(Command::Breeds(rest.to_string())),
            "zip" => Ok(Command::Zip(rest.to_string())),
            "page" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument("page"));
                }
                rest.parse()
                    .map(Command::Page)
                    .map_err(|_| ParseError::InvalidPage(rest.to_string()))
            }
            "next" | "n" => Ok(Command::Next),
            "prev" | "p" => Ok(Command::Prev),
            "fav" | "favorite" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument("fav"));
                }
                let target = if let Some(id) = rest.strip_prefix("id:") {
                    if id.is_empty() {
                        return Err(ParseError::MissingArgument("fav id:"));
                    }
                    FavoriteTarget::Id(id.to_string())
                } else {
                    match rest.parse::<usize>() {
                        Ok(index) => FavoriteTarget::Index(index),
                        Err(_) => FavoriteTarget::Id(rest.to_string()),
                    }
                };
                Ok(Command::Favorite(target))
            }
            "match" => Ok(Command::Match),
            "close" => Ok(Command::Close),
            "show" | "ls" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

/// `login <name...> <email>`; the last word is the email
fn parse_login(rest: &str) -> Command {
    match rest.rsplit_once(char::is_whitespace) {
        Some((name, email)) => Command::Login {
            name: name.trim().to_string(),
            email: email.to_string(),
        },
        None => Command::Login {
            name: rest.to_string(),
            email: String::new(),
        },
    }
}

pub const HELP: &str = "\
Commands:
  login <name> <email>   start a session
  logout                 end the session
  breed <text>           search by breed (empty clears the search)
  breeds [text]          list breed suggestions
  zip [code]             filter by ZIP code (empty removes the filter)
  page <n> | next | prev move between result pages
  fav <n|id>             toggle a favorite by list position or dog id
  fav id:<id>            toggle by dog id, even an all-digit one
  match                  find your best match among favorites
  close                  close the match display
  show                   redraw the results
  help                   show this text
  quit                   leave";
