use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

/// A notification for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
pub enum SessionEvent {
    ScoreChanged(usize),
    LevelChanged(usize),
    LinesRemovedChanged(usize),
    BoardRedrawNeeded,
    /// The session has just entered [`SessionState::GameOver`](super::SessionState::GameOver).
    GameOver,
}

/// Receives session notifications as callbacks.
///
/// All methods default to doing nothing, so an observer only overrides the
/// notifications it cares about.
pub trait SessionObserver {
    fn score_changed(&mut self, _score: usize) {}
    fn level_changed(&mut self, _level: usize) {}
    fn lines_removed_changed(&mut self, _lines: usize) {}
    fn board_redraw_needed(&mut self) {}
    fn game_over(&mut self) {}
}

/// Notifications produced by one session command.
///
/// Each kind of event appears at most once, carrying its value at the end of
/// the command, and iteration always yields them in this order:
/// score, level, lines removed, board redraw, game over.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionEvents {
    accepted: bool,
    score: Option<usize>,
    level: Option<usize>,
    lines_removed: Option<usize>,
    redraw: bool,
    game_over: bool,
}

impl SessionEvents {
    const MAX_EVENTS: usize = 5;

    /// Returns whether the command was applied.
    ///
    /// Movement and rotation commands report `false` when the move was
    /// rejected or there was no piece to move.
    #[must_use]
    pub const fn accepted(&self) -> bool {
        self.accepted
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = SessionEvent> {
        self.collect_events().into_iter()
    }

    fn collect_events(&self) -> ArrayVec<SessionEvent, { Self::MAX_EVENTS }> {
        let mut events = ArrayVec::<SessionEvent, { Self::MAX_EVENTS }>::new();
        if let Some(score) = self.score {
            events.push(SessionEvent::ScoreChanged(score));
        }
        if let Some(level) = self.level {
            events.push(SessionEvent::LevelChanged(level));
        }
        if let Some(lines) = self.lines_removed {
            events.push(SessionEvent::LinesRemovedChanged(lines));
        }
        if self.redraw {
            events.push(SessionEvent::BoardRedrawNeeded);
        }
        if self.game_over {
            events.push(SessionEvent::GameOver);
        }
        events
    }

    /// Replays the events onto `observer`, in order.
    pub fn dispatch<O>(&self, observer: &mut O)
    where
        O: SessionObserver + ?Sized,
    {
        for event in self.iter() {
            match event {
                SessionEvent::ScoreChanged(score) => observer.score_changed(score),
                SessionEvent::LevelChanged(level) => observer.level_changed(level),
                SessionEvent::LinesRemovedChanged(lines) => observer.lines_removed_changed(lines),
                SessionEvent::BoardRedrawNeeded => observer.board_redraw_needed(),
                SessionEvent::GameOver => observer.game_over(),
            }
        }
    }

    pub(crate) fn set_accepted(&mut self, accepted: bool) {
        self.accepted = accepted;
    }

    pub(crate) fn score_changed(&mut self, score: usize) {
        self.score = Some(score);
    }

    pub(crate) fn level_changed(&mut self, level: usize) {
        self.level = Some(level);
    }

    pub(crate) fn lines_removed_changed(&mut self, lines: usize) {
        self.lines_removed = Some(lines);
    }

    pub(crate) fn board_redraw_needed(&mut self) {
        self.redraw = true;
    }

    pub(crate) fn game_over(&mut self) {
        self.game_over = true;
    }
}

impl IntoIterator for &SessionEvents {
    type Item = SessionEvent;
    type IntoIter = arrayvec::IntoIter<SessionEvent, { SessionEvents::MAX_EVENTS }>;

    fn into_iter(self) -> Self::IntoIter {
        self.collect_events().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl SessionObserver for Recorder {
        fn score_changed(&mut self, score: usize) {
            self.0.push(format!("score {score}"));
        }

        fn lines_removed_changed(&mut self, lines: usize) {
            self.0.push(format!("lines {lines}"));
        }

        fn board_redraw_needed(&mut self) {
            self.0.push("redraw".to_owned());
        }
    }

    #[test]
    fn test_empty_batch() {
        let events = SessionEvents::default();
        assert!(events.is_empty());
        assert!(!events.accepted());
    }

    #[test]
    fn test_events_come_out_in_fixed_order() {
        let mut events = SessionEvents::default();
        events.game_over();
        events.board_redraw_needed();
        events.lines_removed_changed(2);
        events.score_changed(10);
        events.level_changed(3);
        events.score_changed(30);

        let collected: Vec<_> = events.iter().collect();
        assert_eq!(
            collected,
            [
                SessionEvent::ScoreChanged(30),
                SessionEvent::LevelChanged(3),
                SessionEvent::LinesRemovedChanged(2),
                SessionEvent::BoardRedrawNeeded,
                SessionEvent::GameOver,
            ]
        );
        assert_eq!((&events).into_iter().collect::<Vec<_>>(), collected);
    }

    #[test]
    fn test_dispatch_skips_unhandled_events() {
        let mut events = SessionEvents::default();
        events.level_changed(2);
        events.score_changed(17);
        events.lines_removed_changed(1);
        events.board_redraw_needed();

        let mut recorder = Recorder::default();
        events.dispatch(&mut recorder);
        assert_eq!(recorder.0, ["score 17", "lines 1", "redraw"]);
    }
}
