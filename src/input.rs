//! Keyboard input for the picker
//!
//! Decoded keys map to `Action`s; `InputHandler` applies them to the
//! session one key at a time and reports whether the session is still
//! running.

use std::sync::Arc;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use tokio_util::sync::CancellationToken;

use crate::render::Renderer;
use crate::selection::SelectionNotifier;
use crate::session::{Outcome, Session};

/// Decoded key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Escape,
    Ctrl(char),
}

impl Key {
    /// Map a crossterm key event; releases and unmapped keys give `None`
    pub fn from_crossterm(event: &event::KeyEvent) -> Option<Self> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        Some(match event.code {
            KeyCode::Char(c) if ctrl => Key::Ctrl(c.to_ascii_lowercase()),
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Tab => Key::Tab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::Esc => Key::Escape,
            _ => return None,
        })
    }
}

/// Blocking key reader over the process tty
///
/// Ends when reading from the terminal fails.
#[derive(Debug, Default)]
pub struct CrosstermKeys;

impl Iterator for CrosstermKeys {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        loop {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if let Some(key) = Key::from_crossterm(&key) {
                        return Some(key);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("failed to read key event: {}", e);
                    return None;
                }
            }
        }
    }
}

/// What a key asks the session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(isize),
    MoveTo(usize),
    MoveToEnd,
    Confirm,
    Cancel,
}

impl Action {
    pub fn from_key(key: Key, page_size: usize) -> Option<Self> {
        let page = page_size as isize;
        Some(match key {
            Key::Up | Key::Char('k') => Action::Move(-1),
            Key::Down | Key::Char('j') => Action::Move(1),
            Key::PageUp => Action::Move(-page),
            Key::PageDown => Action::Move(page),
            Key::Home => Action::MoveTo(0),
            Key::End => Action::MoveToEnd,
            Key::Enter => Action::Confirm,
            // Raw mode swallows SIGINT, so Ctrl-C has to cancel here
            Key::Escape | Key::Ctrl('c') => Action::Cancel,
            _ => return None,
        })
    }
}

/// Input loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Running,
    Stopped(Outcome),
}

impl InputState {
    pub fn is_stopped(&self) -> bool {
        matches!(self, InputState::Stopped(_))
    }
}

/// Applies keys to the session
pub struct InputHandler {
    session: Session,
    renderer: Arc<Renderer>,
    notifier: Arc<SelectionNotifier>,
    shutdown: CancellationToken,
    page_size: usize,
    state: InputState,
}

impl InputHandler {
    pub fn new(
        session: Session,
        renderer: Arc<Renderer>,
        notifier: Arc<SelectionNotifier>,
        shutdown: CancellationToken,
    ) -> Self {
        let page_size = session.snapshot().page_size;
        Self {
            session,
            renderer,
            notifier,
            shutdown,
            page_size,
            state: InputState::Running,
        }
    }

    /// Consume one key
    pub fn handle(&mut self, key: Key) -> InputState {
        if self.state.is_stopped() {
            return self.state;
        }
        if let Some(outcome) = self.session.outcome() {
            tracing::debug!(?key, "session already stopped, ignoring key");
            self.state = InputState::Stopped(outcome);
            return self.state;
        }

        let Some(action) = Action::from_key(key, self.page_size) else {
            return self.state;
        };

        let snapshot = match action {
            Action::Move(delta) => self.session.move_selection(delta),
            Action::MoveTo(index) => self.session.move_to(index),
            Action::MoveToEnd => self.session.move_to_end(),
            Action::Confirm => return self.finish(self.session.confirm()),
            Action::Cancel => return self.finish(self.session.cancel()),
        };

        self.renderer.render(&snapshot);
        self.notifier.selection_changed(&snapshot);
        self.state
    }

    fn finish(&mut self, outcome: Outcome) -> InputState {
        tracing::debug!(?outcome, "interaction ended");
        self.notifier.interaction_ended(outcome);
        self.state = InputState::Stopped(outcome);
        self.shutdown.cancel();
        self.state
    }

    /// Read keys until the session stops or the keys run out
    ///
    /// Running out of keys cancels the session. The shutdown token is
    /// tripped on every exit path.
    pub fn run<K>(mut self, keys: K) -> InputState
    where
        K: IntoIterator<Item = Key>,
    {
        let _shutdown = self.shutdown.clone().drop_guard();

        for key in keys {
            if self.handle(key).is_stopped() {
                return self.state;
            }
        }

        if !self.state.is_stopped() {
            tracing::debug!("key source exhausted, cancelling");
            return self.finish(self.session.cancel());
        }
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::BoxLayout;
    use crate::render::MemorySink;
    use crate::selection::SelectionEvent;
    use crate::table::{TableColumn, TableData, TableRow};
    use crate::theme::{TableStyle, Theme};
    use crossterm::event::KeyEvent;
    use std::sync::Mutex;

    struct Harness {
        session: Session,
        sink: MemorySink,
        events: Arc<Mutex<Vec<SelectionEvent>>>,
        shutdown: CancellationToken,
        handler: InputHandler,
    }

    fn harness(rows: usize, page_size: usize) -> Harness {
        let data = TableData::new(
            vec![TableColumn::new("n")],
            (0..rows)
                .map(|i| -> TableRow { [i.to_string()].into_iter().collect() })
                .collect(),
        );
        let session = Session::new(data, page_size);
        let sink = MemorySink::new();
        let renderer = Arc::new(Renderer::new(
            Arc::new(BoxLayout),
            TableStyle::default(),
            Theme::plain(),
            Box::new(sink.clone()),
        ));
        let events = Arc::new(Mutex::new(Vec::new()));
        let recorder = events.clone();
        let notifier = Arc::new(
            SelectionNotifier::new(5)
                .with_callback(move |event| recorder.lock().unwrap().push(*event)),
        );
        let shutdown = CancellationToken::new();
        let handler = InputHandler::new(session.clone(), renderer, notifier, shutdown.clone());
        Harness {
            session,
            sink,
            events,
            shutdown,
            handler,
        }
    }

    fn window(session: &Session) -> (usize, usize) {
        let vp = session.snapshot().viewport;
        (vp.start_index, vp.end_index())
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Action::from_key(Key::Up, 5), Some(Action::Move(-1)));
        assert_eq!(Action::from_key(Key::Char('k'), 5), Some(Action::Move(-1)));
        assert_eq!(Action::from_key(Key::Down, 5), Some(Action::Move(1)));
        assert_eq!(Action::from_key(Key::Char('j'), 5), Some(Action::Move(1)));
        assert_eq!(Action::from_key(Key::PageUp, 5), Some(Action::Move(-5)));
        assert_eq!(Action::from_key(Key::PageDown, 5), Some(Action::Move(5)));
        assert_eq!(Action::from_key(Key::Home, 5), Some(Action::MoveTo(0)));
        assert_eq!(Action::from_key(Key::End, 5), Some(Action::MoveToEnd));
        assert_eq!(Action::from_key(Key::Enter, 5), Some(Action::Confirm));
        assert_eq!(Action::from_key(Key::Escape, 5), Some(Action::Cancel));
        assert_eq!(Action::from_key(Key::Ctrl('c'), 5), Some(Action::Cancel));
        assert_eq!(Action::from_key(Key::Char('x'), 5), None);
        assert_eq!(Action::from_key(Key::Left, 5), None);
    }

    #[test]
    fn test_from_crossterm() {
        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(Key::from_crossterm(&down), Some(Key::Down));

        let ctrl_c = KeyEvent::new(KeyCode::Char('C'), KeyModifiers::CONTROL);
        assert_eq!(Key::from_crossterm(&ctrl_c), Some(Key::Ctrl('c')));

        let mut release = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(Key::from_crossterm(&release), None);

        let f1 = KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE);
        assert_eq!(Key::from_crossterm(&f1), None);
    }

    #[test]
    fn test_navigation_scenario() {
        let mut h = harness(12, 5);

        for _ in 0..4 {
            assert_eq!(h.handler.handle(Key::Down), InputState::Running);
        }
        assert_eq!(h.session.snapshot().selected_index, 4);
        assert_eq!(window(&h.session), (0, 5));

        h.handler.handle(Key::Down);
        assert_eq!(h.session.snapshot().selected_index, 5);
        assert_eq!(window(&h.session), (1, 6));

        h.handler.handle(Key::End);
        assert_eq!(h.session.snapshot().selected_index, 11);
        assert_eq!(window(&h.session), (7, 12));

        h.handler.handle(Key::Home);
        assert_eq!(h.session.snapshot().selected_index, 0);
        assert_eq!(window(&h.session), (0, 5));

        assert_eq!(h.sink.len(), 7);
        assert_eq!(h.events.lock().unwrap().len(), 7);
    }

    #[test]
    fn test_page_keys_move_by_page_size() {
        let mut h = harness(12, 5);
        h.handler.handle(Key::PageDown);
        assert_eq!(h.session.snapshot().selected_index, 5);
        h.handler.handle(Key::PageDown);
        h.handler.handle(Key::PageDown);
        assert_eq!(h.session.snapshot().selected_index, 11);
        h.handler.handle(Key::PageUp);
        assert_eq!(h.session.snapshot().selected_index, 6);
    }

    #[test]
    fn test_ignored_key_does_nothing() {
        let mut h = harness(12, 5);
        assert_eq!(h.handler.handle(Key::Char('x')), InputState::Running);
        assert!(h.sink.is_empty());
        assert!(h.events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_enter_confirms() {
        let mut h = harness(12, 5);
        h.handler.handle(Key::Down);
        h.handler.handle(Key::Down);

        let state = h.handler.handle(Key::Enter);
        assert_eq!(state, InputState::Stopped(Outcome::Confirmed(2)));
        assert_eq!(h.session.final_result().unwrap(), 2);
        assert!(h.shutdown.is_cancelled());

        let events = h.events.lock().unwrap();
        assert_eq!(events.last(), Some(&SelectionEvent::Ended(Outcome::Confirmed(2))));
        // Enter does not re-render
        assert_eq!(h.sink.len(), 2);
    }

    #[test]
    fn test_escape_cancels() {
        let mut h = harness(12, 5);
        assert_eq!(
            h.handler.handle(Key::Escape),
            InputState::Stopped(Outcome::Cancelled)
        );
        assert!(h.session.final_result().unwrap_err().is_cancelled());
        assert_eq!(
            h.events.lock().unwrap().last(),
            Some(&SelectionEvent::Ended(Outcome::Cancelled))
        );
    }

    #[test]
    fn test_keys_after_stop_are_ignored() {
        let mut h = harness(12, 5);
        h.handler.handle(Key::Enter);
        let frames = h.sink.len();

        assert!(h.handler.handle(Key::Down).is_stopped());
        assert_eq!(h.session.snapshot().selected_index, 0);
        assert_eq!(h.sink.len(), frames);
    }

    #[test]
    fn test_externally_stopped_session_aborts() {
        let mut h = harness(12, 5);
        h.session.move_to(3);
        h.session.confirm();

        assert_eq!(
            h.handler.handle(Key::Down),
            InputState::Stopped(Outcome::Confirmed(3))
        );
        assert_eq!(h.session.snapshot().selected_index, 3);
        assert!(h.sink.is_empty());
    }

    #[test]
    fn test_run_stops_at_enter() {
        let h = harness(12, 5);
        let keys = vec![Key::Down, Key::Down, Key::Down, Key::Enter, Key::Down];

        let state = h.handler.run(keys);
        assert_eq!(state, InputState::Stopped(Outcome::Confirmed(3)));
        assert_eq!(h.session.snapshot().selected_index, 3);
        assert!(h.shutdown.is_cancelled());
    }

    #[test]
    fn test_run_cancels_when_keys_run_out() {
        let h = harness(12, 5);
        let state = h.handler.run(vec![Key::Down]);
        assert_eq!(state, InputState::Stopped(Outcome::Cancelled));
        assert!(h.session.is_stopped());
        assert!(h.shutdown.is_cancelled());
    }
}
