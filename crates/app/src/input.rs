//! Terminal command parsing

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    Home,
    New(String),
    Random,
    Open(String),
    Watch(String),
    Accept,
    Delete,
    Enter,
    Next(String),
    /// Anything that is not a keyword: a username or letters to type
    Text(String),
}

/// Parse one input line; blank lines yield nothing
pub fn parse(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match (word.to_ascii_lowercase().as_str(), rest.is_empty()) {
        ("quit" | "exit", true) => Command::Quit,
        ("help", true) => Command::Help,
        ("home", true) => Command::Home,
        ("random", true) => Command::Random,
        ("accept", true) => Command::Accept,
        ("del" | "delete", true) => Command::Delete,
        ("enter", true) => Command::Enter,
        ("new", _) => Command::New(rest.to_string()),
        ("open", false) => Command::Open(rest.to_string()),
        ("watch", false) => Command::Watch(rest.to_string()),
        ("next", false) => Command::Next(rest.to_string()),
        _ => Command::Text(line.to_string()),
    };
    Some(command)
}

pub const HELP: &str = "\
Commands:
  new WORD     start a duel (blank uses the random word)
  random       draw a random word
  open ID      open a duel
  watch ID     spectate a game
  accept       join the open duel
  LETTERS      type letters into your guess
  del          erase the last letter
  enter        submit the guess
  next WORD    pick the word for the next game
  home         back to the start
  quit         leave";
