use chrono::NaiveDate;
use itertools::Itertools;
use url::form_urlencoded;

use crate::game::{GameState, MAX_TRY_COUNT};
use crate::guess::Guess;

const SHARE_URL: &str = "https://oec.world/en/tradle/";

/// Display flags that changed how the game was played
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShareFlags {
    pub hide_image_mode: bool,
    pub rotation_mode: bool,
}

/// Five squares: one green per full 20%, one yellow for a remaining 10%
pub fn proximity_squares(proximity: u8) -> String {
    let green = (proximity / 20) as usize;
    let yellow = usize::from(proximity - (green as u8) * 20 >= 10);
    let white = 5 - green - yellow;

    "🟩".repeat(green) + &"🟨".repeat(yellow) + &"⬜".repeat(white)
}

/// Text summary of a finished (or running) game
pub fn share_text(guesses: &[Guess], day: NaiveDate, flags: ShareFlags) -> String {
    let score = match GameState::from_guesses(guesses) {
        GameState::Won => guesses.len().to_string(),
        _ => "X".to_string(),
    };

    let mut title = format!(
        "#Tradle #{} {}/{}",
        day.format("%Y-%m-%d"),
        score,
        MAX_TRY_COUNT
    );
    if flags.hide_image_mode {
        title.push_str(" (🙈)");
    }
    if flags.rotation_mode {
        title.push_str(" (🌀)");
    }

    let grid = guesses
        .iter()
        .map(|g| format!("{}{}", proximity_squares(g.proximity()), g.direction.emoji()))
        .join("\n");

    format!("{title}\n{grid}\n{SHARE_URL}")
}

pub fn tweet_url(text: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(text.as_bytes()).collect();
    format!("https://twitter.com/intent/tweet?text={encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geography::Direction;

    fn guess(distance: u64, direction: Direction) -> Guess {
        Guess {
            name: "x".to_string(),
            distance,
            direction,
            country: None,
        }
    }

    #[test]
    fn test_proximity_squares() {
        assert_eq!(proximity_squares(100), "🟩🟩🟩🟩🟩");
        assert_eq!(proximity_squares(0), "⬜⬜⬜⬜⬜");
        assert_eq!(proximity_squares(55), "🟩🟩🟨⬜⬜");
        assert_eq!(proximity_squares(43), "🟩🟩⬜⬜⬜");
        assert_eq!(proximity_squares(71), "🟩🟩🟩🟨⬜");
        assert_eq!(proximity_squares(99), "🟩🟩🟩🟩🟨");
    }

    #[test]
    fn test_share_text_won() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let guesses = vec![guess(3_300_000, Direction::NE), guess(0, Direction::Same)];
        let text = share_text(&guesses, day, ShareFlags::default());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "#Tradle #2024-03-09 2/6");
        assert_eq!(lines[1], "🟩🟩🟩🟩⬜↗️");
        assert_eq!(lines[2], "🟩🟩🟩🟩🟩🎉");
        assert_eq!(lines[3], SHARE_URL);
    }

    #[test]
    fn test_share_text_lost_with_flags() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let guesses = vec![guess(19_000_000, Direction::S); MAX_TRY_COUNT];
        let flags = ShareFlags {
            hide_image_mode: true,
            rotation_mode: true,
        };
        let text = share_text(&guesses, day, flags);
        assert!(text.starts_with("#Tradle #2024-01-01 X/6 (🙈) (🌀)\n"));
        assert_eq!(text.lines().count(), MAX_TRY_COUNT + 2);
    }

    #[test]
    fn test_tweet_url() {
        assert_eq!(
            tweet_url("#Tradle 1/6"),
            "https://twitter.com/intent/tweet?text=%23Tradle+1%2F6"
        );
        assert!(tweet_url("🟩\n").ends_with("?text=%F0%9F%9F%A9%0A"));
    }
}
