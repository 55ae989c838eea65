use chrono::{NaiveDate, Utc};
use std::time::{Duration, Instant};
use tracing::error;

use crate::config::Config;
use crate::error::GameError;
use crate::game::{Game, SubmitOutcome};
use crate::oec;
use crate::runtime::Action;
use crate::share::{self, ShareFlags};

/// How long a transient notice stays on screen
pub const NOTICE_TTL: Duration = Duration::from_millis(2000);

/// Input field length cap; longer than any country name
const MAX_INPUT_LEN: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
    Success,
}

/// Toast-like message shown under the input
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    /// `None` keeps the notice until it is replaced
    pub expires_at: Option<Instant>,
}

impl Notice {
    pub fn transient(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            expires_at: Some(Instant::now() + NOTICE_TTL),
        }
    }

    pub fn sticky(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            expires_at: None,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// What the event loop should do after a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// Open a URL in the browser
    Open(String),
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub game: Game,
    pub config: Config,
    pub notice: Option<Notice>,
}

impl App {
    pub fn new(game: Game, config: Config) -> Self {
        Self {
            game,
            config,
            notice: None,
        }
    }

    pub fn on_tick(&mut self) {
        self.expire_notice(Instant::now());
    }

    pub fn expire_notice(&mut self, now: Instant) {
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
        }
    }

    /// The visualization is withheld in hide-image mode until the game ends
    pub fn visualization_hidden(&self) -> bool {
        self.config.hide_image_mode && !self.game.has_ended()
    }

    pub fn share_text(&self, day: NaiveDate) -> String {
        share::share_text(self.game.guesses(), day, ShareFlags::from(self.config))
    }

    pub fn handle_action(&mut self, action: Action) -> Control {
        match action {
            Action::Quit => return Control::Quit,
            Action::OpenVisualization => return self.open_visualization(),
            Action::ShowImage => {
                self.config.hide_image_mode = false;
                return Control::Continue;
            }
            Action::CancelRotation => {
                self.config.rotation_mode = false;
                return Control::Continue;
            }
            _ => {}
        }

        if self.game.has_ended() {
            self.handle_ended_action(action)
        } else {
            self.handle_playing_action(action)
        }
    }

    fn handle_playing_action(&mut self, action: Action) -> Control {
        match action {
            Action::Char(c) => {
                if self.game.input.chars().count() < MAX_INPUT_LEN {
                    self.game.input.push(c);
                }
            }
            Action::Backspace => {
                self.game.input.pop();
            }
            Action::Complete => {
                self.game.complete_input();
            }
            Action::Submit => self.submit(),
            Action::Skip => self.skip(),
            _ => {}
        }
        Control::Continue
    }

    fn handle_ended_action(&mut self, action: Action) -> Control {
        match action {
            Action::Char('n') => {
                if let Err(e) = self.game.new_game() {
                    self.report(e);
                } else {
                    self.notice = None;
                }
                Control::Continue
            }
            Action::Char('o') => Control::Open(oec::profile_url(self.game.target())),
            Action::Char('t') => {
                let text = self.share_text(Utc::now().date_naive());
                Control::Open(share::tweet_url(&text))
            }
            _ => Control::Continue,
        }
    }

    fn submit(&mut self) {
        match self.game.submit() {
            Ok(SubmitOutcome::Miss(_)) => self.notice = None,
            Ok(SubmitOutcome::Won(_)) => {
                self.notice = Some(Notice::sticky(NoticeKind::Success, "Well done!"));
            }
            Ok(SubmitOutcome::Lost { answer, .. }) => {
                self.notice = Some(Notice::sticky(NoticeKind::Info, answer.to_uppercase()));
            }
            Err(e) => self.report(e),
        }
    }

    fn skip(&mut self) {
        match self.game.skip() {
            Ok(answer) => {
                self.notice = Some(Notice::transient(NoticeKind::Info, answer.to_uppercase()));
            }
            Err(e) => self.report(e),
        }
    }

    fn open_visualization(&mut self) -> Control {
        if self.visualization_hidden() {
            self.notice = Some(Notice::transient(
                NoticeKind::Info,
                "Visualization hidden, press Ctrl-H to show it",
            ));
            return Control::Continue;
        }
        Control::Open(oec::embed_url(self.game.target()))
    }

    fn report(&mut self, e: GameError) {
        let text = match &e {
            GameError::UnknownCountry(_) => "Unknown country!".to_string(),
            GameError::GameOver => "The game is over".to_string(),
            other => {
                error!(error = %other, "game action failed");
                other.to_string()
            }
        };
        self.notice = Some(Notice::transient(NoticeKind::Error, text));
    }
}
