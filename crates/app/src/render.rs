//! Plain-text rendering of scenes for the terminal

use std::fmt::Write;

use worduel_core::{
    ActiveView, Banner, DuelScene, DuelSummary, FollowUp, KeyboardState, LetterStatus, Role,
    Scene, Score, SpectatorView, MAX_CHALLENGES, MAX_WORD_LENGTH,
};

use crate::state::{Notice, NoticeKind};

const KEYBOARD_ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"];

pub fn render_scene(scene: &Scene) -> String {
    match scene {
        Scene::Username => "Choose a username: type it and press enter.".to_string(),
        Scene::CreateDuel => {
            "Start a duel: `new WORD`, `random` for a word, `open ID` to join, `watch GAME`."
                .to_string()
        }
        Scene::Loading => "Loading...".to_string(),
        Scene::Duel(DuelScene::Closed) => {
            "This duel already has two players. `home` to go back.".to_string()
        }
        Scene::Duel(DuelScene::AcceptPrompt { creator }) => {
            format!("{} challenged you to a duel. `accept` to play.", creator.name)
        }
        Scene::Duel(DuelScene::NoGame { can_create: true }) => {
            "No game in this duel yet. Pick the first word: `next WORD`.".to_string()
        }
        Scene::Duel(DuelScene::NoGame { can_create: false }) => {
            "No game in this duel yet. Please stand by.".to_string()
        }
        Scene::Duel(DuelScene::Active(view)) => render_active(view),
        Scene::Spectator(view) => render_spectator(view),
    }
}

fn cell(letter: char, status: LetterStatus) -> String {
    match status {
        LetterStatus::Correct => format!("[{}]", letter),
        LetterStatus::Present => format!("({})", letter),
        LetterStatus::Absent => format!(" {} ", letter.to_ascii_lowercase()),
        LetterStatus::Unset => format!(" {} ", letter),
    }
}

fn render_row(guess: &str, statuses: &[LetterStatus]) -> String {
    guess
        .chars()
        .enumerate()
        .map(|(i, c)| cell(c, statuses.get(i).copied().unwrap_or_default()))
        .collect()
}

fn render_grid(out: &mut String, guesses: &[String], rows: &[Vec<LetterStatus>], current: Option<&str>) {
    for (guess, statuses) in guesses.iter().zip(rows) {
        let _ = writeln!(out, "  {}", render_row(guess, statuses));
    }
    let mut remaining = MAX_CHALLENGES.saturating_sub(guesses.len());
    if let Some(current) = current.filter(|_| remaining > 0) {
        let padded: String = current
            .chars()
            .chain(std::iter::repeat('_'))
            .take(MAX_WORD_LENGTH)
            .map(|c| format!(" {} ", c))
            .collect();
        let _ = writeln!(out, "  {}", padded);
        remaining -= 1;
    }
    for _ in 0..remaining {
        let _ = writeln!(out, "  {}", " . ".repeat(MAX_WORD_LENGTH));
    }
}

fn render_keyboard(keyboard: &KeyboardState) -> String {
    KEYBOARD_ROWS
        .iter()
        .map(|row| {
            row.chars()
                .map(|c| match keyboard.get(c) {
                    LetterStatus::Absent => " · ".to_string(),
                    status => cell(c, status),
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n  ")
}

/// `alice 1 : 4 bob`, or just the one player while the duel is open
fn render_scores(scores: &[Score]) -> Option<String> {
    match scores {
        [first, second] => Some(format!(
            "{} {} : {} {}",
            first.user_name, first.score, second.score, second.user_name
        )),
        [only] => Some(format!("{} {}", only.user_name, only.score)),
        _ => None,
    }
}

fn render_active(view: &ActiveView) -> String {
    let mut out = String::new();
    if let Some(scores) = render_scores(&view.scores) {
        let _ = writeln!(out, "{}", scores);
    }
    let opponent = match (view.role, &view.player) {
        (Role::Creator, Some(player)) => format!("{} is guessing your word", player.name),
        (Role::Creator, None) => "Waiting for someone to accept".to_string(),
        (Role::Player, _) => format!("Guess {}'s word", view.creator.name),
        (Role::Spectator, _) => format!("Watching {}'s game", view.creator.name),
    };
    let _ = writeln!(out, "{}", opponent);

    let current = view.is_interactive().then_some(view.current_guess.as_str());
    render_grid(&mut out, &view.guesses, &view.rows, current);

    if let Some(keyboard) = &view.keyboard {
        let _ = writeln!(out, "  {}", render_keyboard(keyboard));
        if !view.discarded.is_empty() {
            let letters: Vec<String> = view.discarded.iter().map(char::to_string).collect();
            let _ = writeln!(out, "Not in the word: {}", letters.join(" "));
        }
        let _ = writeln!(out, "Type letters, `del` to erase, `enter` to submit.");
    }

    match (view.banner, &view.solution) {
        (Some(Banner::Won), _) => {
            let _ = writeln!(out, "Solved in {} guesses!", view.guesses.len());
        }
        (Some(Banner::Lost), Some(solution)) => {
            let _ = writeln!(out, "Out of guesses. The word was {}.", solution);
        }
        (Some(Banner::Lost), None) => {
            let _ = writeln!(out, "Out of guesses.");
        }
        (None, _) => {}
    }

    match view.follow_up {
        FollowUp::CreateNextGame => out.push_str("Your turn to pick a word: `next WORD`."),
        FollowUp::StandBy => out.push_str("Please stand by for the next game."),
        FollowUp::None => {}
    }

    out.trim_end().to_string()
}

fn render_spectator(view: &SpectatorView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Spectating {}'s game {}", view.creator.name, view.game_id);
    if !view.has_started() {
        let _ = writeln!(out, "No guesses yet.");
    }
    render_grid(&mut out, &view.guesses, &view.rows, None);
    match view.banner {
        Some(Banner::Won) => out.push_str("Solved!"),
        Some(Banner::Lost) => out.push_str("Not solved."),
        None => {}
    }
    out.trim_end().to_string()
}

/// Recent duels with the identity's score first
pub fn render_recent(duels: &[DuelSummary], me: &str) -> String {
    if duels.is_empty() {
        return "No recent duels.".to_string();
    }

    duels
        .iter()
        .map(|duel| {
            let opponent = duel
                .players
                .iter()
                .find(|p| p.id != me)
                .map_or("(open)", |p| p.name.as_str());
            let mine = duel.players.iter().position(|p| p.id == me);
            let theirs = duel.players.iter().position(|p| p.id != me);
            let score = |i: Option<usize>| i.and_then(|i| duel.score_at(i)).unwrap_or(0);
            let turn = if duel.is_turn_of(me) { " (your turn)" } else { "" };
            format!(
                "  {}  vs {}  {}-{}{}",
                duel.id,
                opponent,
                score(mine),
                score(theirs),
                turn
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_notice(notice: &Notice) -> String {
    let mark = match notice.kind {
        NoticeKind::Success => '✓',
        NoticeKind::Error => '✗',
    };
    format!("{} {} {}", notice.timestamp.format("%H:%M:%S"), mark, notice.text)
}
