use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

/// What the player asked for, decoded from a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Printable character; typed while playing, a command once the game ended
    Char(char),
    Backspace,
    /// Tab completion from the suggestions
    Complete,
    Submit,
    Skip,
    OpenVisualization,
    ShowImage,
    CancelRotation,
    Quit,
}

impl Action {
    /// `None` for keys the game has no use for
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        // windows reports releases too
        if key.kind == KeyEventKind::Release {
            return None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            KeyCode::Esc => Action::Quit,
            KeyCode::Char('c') if ctrl => Action::Quit,
            KeyCode::Char('s') if ctrl => Action::Skip,
            KeyCode::Char('o') if ctrl => Action::OpenVisualization,
            KeyCode::Char('h') if ctrl => Action::ShowImage,
            KeyCode::Char('r') if ctrl => Action::CancelRotation,
            KeyCode::Char(_) if ctrl => return None,
            KeyCode::Char(c) => Action::Char(c),
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Tab => Action::Complete,
            KeyCode::Enter => Action::Submit,
            _ => return None,
        };
        Some(action)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Action(Action),
    /// Terminal resized; only a redraw is needed
    Redraw,
    Tick,
    /// The input source is gone, nothing more will arrive
    Closed,
}

/// Read the terminal on a background thread, forwarding decoded events
fn spawn_terminal_reader(tx: Sender<GameEvent>) {
    std::thread::spawn(move || loop {
        let ev = match event::read() {
            Ok(Event::Key(key)) => match Action::from_key(key) {
                Some(action) => GameEvent::Action(action),
                None => continue,
            },
            Ok(Event::Resize(_, _)) => GameEvent::Redraw,
            Ok(_) => continue,
            Err(e) => {
                debug!(error = %e, "terminal reader stopped");
                break;
            }
        };
        if tx.send(ev).is_err() {
            break;
        }
    });
}

/// Yields player events, or a tick whenever none arrives within the tick interval
pub struct EventLoop {
    rx: Receiver<GameEvent>,
    tick: Duration,
}

impl EventLoop {
    pub fn new(rx: Receiver<GameEvent>, tick: Duration) -> Self {
        Self { rx, tick }
    }

    /// Events from the real terminal
    pub fn from_terminal(tick: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        spawn_terminal_reader(tx);
        Self::new(rx, tick)
    }

    pub fn next(&self) -> GameEvent {
        match self.rx.recv_timeout(self.tick) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => GameEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => GameEvent::Closed,
        }
    }
}
