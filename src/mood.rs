use ratatui::style::Color;

use crate::games::GameId;

/// How the user feels before playing. Intensity runs from 1 (mild) to 10.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mood {
    pub id: &'static str,
    pub label: &'static str,
    pub emoji: &'static str,
    pub intensity: u8,
    pub color: Color,
    /// Best matches first.
    pub games: &'static [GameId],
}

pub static MOODS: [Mood; 6] = [
    Mood {
        id: "stressed",
        label: "Stressed",
        emoji: "😫",
        intensity: 8,
        color: Color::Rgb(255, 120, 80),
        games: &[GameId::Breathing, GameId::BubblePop, GameId::AngerSmash],
    },
    Mood {
        id: "anxious",
        label: "Anxious",
        emoji: "😰",
        intensity: 7,
        color: Color::Rgb(255, 200, 80),
        games: &[GameId::Breathing, GameId::Drawing],
    },
    Mood {
        id: "angry",
        label: "Angry",
        emoji: "😠",
        intensity: 9,
        color: Color::Rgb(230, 60, 60),
        games: &[GameId::AngerSmash, GameId::BubblePop],
    },
    Mood {
        id: "sad",
        label: "Sad",
        emoji: "😢",
        intensity: 6,
        color: Color::Rgb(100, 150, 255),
        games: &[GameId::Drawing, GameId::BubblePop],
    },
    Mood {
        id: "tired",
        label: "Tired",
        emoji: "😴",
        intensity: 5,
        color: Color::Rgb(170, 140, 230),
        games: &[GameId::Breathing, GameId::Drawing],
    },
    Mood {
        id: "okay",
        label: "Okay",
        emoji: "🙂",
        intensity: 3,
        color: Color::Rgb(100, 220, 140),
        games: &[GameId::BubblePop, GameId::Drawing],
    },
];

impl Mood {
    pub fn recommends(&self, game: GameId) -> bool {
        self.games.contains(&game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mood_recommends_something() {
        for mood in MOODS {
            assert!(!mood.games.is_empty(), "{} has no games", mood.id);
            assert!((1..=10).contains(&mood.intensity));
        }
        assert!(MOODS[2].recommends(GameId::AngerSmash));
        assert!(!MOODS[2].recommends(GameId::Breathing));
    }
}
