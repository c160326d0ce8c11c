use crate::games::GameId;
use crate::mood::Mood;
use crate::store::Progress;

const HIGH_INTENSITY: u8 = 7;
const LOW_SCORE: u32 = 60;

/// Whether the coach should check in after a session: the user arrived
/// feeling intense and the session didn't land.
pub fn should_check_in(mood: Option<&Mood>, score: u32) -> bool {
    mood.is_some_and(|m| m.intensity >= HIGH_INTENSITY && score < LOW_SCORE)
}

/// A short recommendation for what to do next.
pub fn advice(mood: Option<&Mood>, played: GameId, score: u32, progress: &Progress) -> Vec<String> {
    let mut lines = Vec::new();

    match mood {
        Some(m) if m.intensity >= HIGH_INTENSITY => lines.push(format!(
            "You came in feeling {} ({}/10). That is a lot to carry.",
            m.label.to_lowercase(),
            m.intensity
        )),
        Some(m) => lines.push(format!(
            "You came in feeling {}. Nice work checking in with yourself.",
            m.label.to_lowercase()
        )),
        None => lines.push("Nice work taking a break.".to_string()),
    }

    if score < LOW_SCORE {
        let next = mood
            .and_then(|m| m.games.iter().copied().find(|g| *g != played))
            .unwrap_or(GameId::Breathing);
        lines.push(format!(
            "Try {} next, or step away for a glass of water.",
            next.name()
        ));
    } else {
        lines.push(format!("{} seems to work for you. Keep it in your toolkit.", played.name()));
    }

    if progress.streak_days >= 2 {
        lines.push(format!(
            "That's {} days in a row. Small habits add up.",
            progress.streak_days
        ));
    } else if progress.total_sessions > 0 {
        lines.push("Coming back tomorrow starts a streak.".to_string());
    }

    lines
}
