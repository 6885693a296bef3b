//! Line-oriented input for the terminal client.
//!
//! A plain line replaces the spell and casts it. Lines starting with `:` are
//! client commands. An empty line recasts whatever is currently composed.

use glyph_core::artifacts::ArtifactKind;
use glyph_core::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Commands to feed the session, in order
    Play(Vec<Command>),
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
Type a spell and press Enter to cast it (e.g. 2+3*5, 2^3-1, (7-2)/5).
  <enter>            cast the current spell again
  :start             start or restart the ritual
  :append <glyphs>   add glyphs without casting
  :undo              remove the last glyph
  :clear             clear the spell
  :stabilize | :s    use Stabilize Flow
  :reshuffle | :r    use Reshuffle
  :help              show this help
  :quit | :q         leave";

/// Maps one line of terminal input to session commands.
pub fn parse_line(line: &str) -> Action {
    let line = line.trim();
    if line.is_empty() {
        return Action::Play(vec![Command::Cast]);
    }

    let Some(rest) = line.strip_prefix(':') else {
        let mut commands = vec![Command::Clear];
        commands.extend(glyph_commands(line));
        commands.push(Command::Cast);
        return Action::Play(commands);
    };

    let (word, arg) = match rest.split_once(char::is_whitespace) {
        Some((word, arg)) => (word, arg.trim()),
        None => (rest, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "start" | "restart" => Action::Play(vec![Command::Start]),
        "append" | "a" => Action::Play(glyph_commands(arg).collect()),
        "undo" | "u" => Action::Play(vec![Command::Undo]),
        "clear" | "c" => Action::Play(vec![Command::Clear]),
        "cast" => Action::Play(vec![Command::Cast]),
        "help" | "h" | "?" => Action::Help,
        "quit" | "q" | "exit" => Action::Quit,
        other => match artifact_alias(other) {
            Some(kind) => Action::Play(vec![Command::UseArtifact { kind }]),
            None => Action::Unknown(line.to_string()),
        },
    }
}

fn artifact_alias(word: &str) -> Option<ArtifactKind> {
    match word {
        "s" => Some(ArtifactKind::Stabilize),
        "r" => Some(ArtifactKind::Reshuffle),
        other => other.parse().ok(),
    }
}

fn glyph_commands(text: &str) -> impl Iterator<Item = Command> + '_ {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(|token| Command::Input { token })
}
