//! Presentation controller — maps the onboarding flag to a screen and user
//! actions to flag writes.

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::courses::{CourseCard, find_course, sample_courses};
use crate::error::StorageError;
use crate::onboarding::OnboardingFlag;
use crate::ui::screen::{Action, Screen};
use crate::ui::view::{Renderer, View};

/// Result of a background flag write.
struct WriteOutcome {
    completed: bool,
    result: Result<(), StorageError>,
}

/// Drives the two screens from the observable onboarding flag.
///
/// The screen only changes when the flag stream publishes; actions merely
/// request writes, which run on spawned tasks.
pub struct Controller {
    flag: OnboardingFlag,
    screen: Screen,
    cards: Vec<CourseCard>,
    /// Value of the write currently in flight, if any.
    pending_write: Option<bool>,
}

impl Controller {
    pub fn new(flag: OnboardingFlag) -> Self {
        let screen = Screen::from_flag(flag.current());
        let mut controller = Self {
            flag,
            screen: Screen::Onboarding,
            cards: Vec::new(),
            pending_write: None,
        };
        controller.enter(screen);
        controller
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn view(&self) -> View {
        match self.screen {
            Screen::Onboarding => View::Onboarding,
            Screen::CourseList => View::CourseList {
                cards: self.cards.clone(),
            },
        }
    }

    /// Run until `Quit`, or until either the action or the flag stream ends.
    /// A save still in flight is awaited before returning. Returns the screen
    /// matching the persisted flag.
    pub async fn run<A, R>(mut self, mut actions: A, renderer: &mut R) -> Screen
    where
        A: Stream<Item = Action> + Unpin,
        R: Renderer + ?Sized,
    {
        let mut flag_values = self.flag.observe();
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<WriteOutcome>();

        loop {
            tokio::select! {
                biased;

                value = flag_values.next() => match value {
                    Some(completed) => {
                        self.on_flag(completed);
                        renderer.render(&self.view());
                    }
                    None => {
                        debug!("Onboarding flag stream closed");
                        break;
                    }
                },

                Some(outcome) = done_rx.recv() => self.on_write_outcome(outcome),

                action = actions.next() => match action {
                    Some(Action::Quit) | None => break,
                    Some(action) => {
                        if self.on_action(action, &done_tx) {
                            renderer.render(&self.view());
                        }
                    }
                },
            }
        }

        self.finish_pending_write(&mut done_rx).await;

        info!(screen = %self.screen, "Controller stopped");
        self.screen
    }

    /// Wait for the save still in flight, if any, so stopping never drops it.
    async fn finish_pending_write(&mut self, done_rx: &mut mpsc::UnboundedReceiver<WriteOutcome>) {
        let Some(completed) = self.pending_write else {
            return;
        };
        debug!(completed, "Waiting for in-flight save before stopping");

        while let Some(outcome) = done_rx.recv().await {
            let finished = outcome.completed == completed;
            self.on_write_outcome(outcome);
            if finished {
                break;
            }
        }

        let persisted = self.flag.current();
        self.on_flag(persisted);
    }

    /// Apply a newly observed flag value.
    fn on_flag(&mut self, completed: bool) {
        if self.pending_write == Some(completed) {
            self.pending_write = None;
        }

        let next = Screen::from_flag(completed);
        if next != self.screen {
            info!(from = %self.screen, to = %next, "Screen transition");
            self.enter(next);
        }
    }

    fn on_write_outcome(&mut self, outcome: WriteOutcome) {
        if self.pending_write == Some(outcome.completed) {
            self.pending_write = None;
        }
        if let Err(e) = outcome.result {
            warn!(
                completed = outcome.completed,
                error = %e,
                screen = %self.screen,
                "Could not save onboarding flag, staying on current screen"
            );
        }
    }

    /// Handle one user action. Returns true when the view changed locally.
    fn on_action(&mut self, action: Action, done: &mpsc::UnboundedSender<WriteOutcome>) -> bool {
        if !self.screen.accepts(&action) {
            debug!(screen = %self.screen, ?action, "Ignoring action not valid on this screen");
            return false;
        }

        if let Some(completed) = self.screen.flag_for(&action) {
            if let Some(pending) = self.pending_write {
                debug!(pending, ?action, "Save already in flight, ignoring action");
                return false;
            }
            self.spawn_write(completed, done.clone());
            return false;
        }

        match action {
            Action::ToggleCourse(code) => self.toggle_card(&code),
            _ => false,
        }
    }

    fn spawn_write(&mut self, completed: bool, done: mpsc::UnboundedSender<WriteOutcome>) {
        self.pending_write = Some(completed);
        let flag = self.flag.clone();
        tokio::spawn(async move {
            let result = flag.write(completed).await;
            let _ = done.send(WriteOutcome { completed, result });
        });
    }

    fn toggle_card(&mut self, code: &str) -> bool {
        let Some(course) = find_course(code) else {
            debug!(code, "Unknown course code");
            return false;
        };
        match self.cards.iter_mut().find(|c| c.course.code == course.code) {
            Some(card) => {
                card.toggle();
                true
            }
            None => false,
        }
    }

    /// Switch screens. Course cards start collapsed on every visit.
    fn enter(&mut self, screen: Screen) {
        self.screen = screen;
        self.cards = match screen {
            Screen::Onboarding => Vec::new(),
            Screen::CourseList => sample_courses().iter().copied().map(CourseCard::new).collect(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::store::{MemoryBackend, PreferenceDataStore};

    async fn controller_with(backend: Arc<MemoryBackend>) -> Controller {
        let store = PreferenceDataStore::open(backend).await.unwrap();
        Controller::new(OnboardingFlag::new(store))
    }

    #[tokio::test]
    async fn starts_on_onboarding_for_fresh_store() {
        let controller = controller_with(Arc::new(MemoryBackend::new())).await;
        assert_eq!(controller.screen(), Screen::Onboarding);
        assert_eq!(controller.view(), View::Onboarding);
    }

    #[tokio::test]
    async fn course_list_has_collapsed_cards() {
        let mut controller = controller_with(Arc::new(MemoryBackend::new())).await;
        controller.on_flag(true);

        let View::CourseList { cards } = controller.view() else {
            panic!("expected course list");
        };
        assert_eq!(cards.len(), 3);
        assert!(cards.iter().all(|c| !c.expanded));
    }

    #[tokio::test]
    async fn toggle_only_on_course_list() {
        let mut controller = controller_with(Arc::new(MemoryBackend::new())).await;
        let (tx, _rx) = mpsc::unbounded_channel();

        assert!(!controller.on_action(Action::ToggleCourse("CS101".into()), &tx));

        controller.on_flag(true);
        assert!(controller.on_action(Action::ToggleCourse("cs101".into()), &tx));
        assert!(!controller.on_action(Action::ToggleCourse("CS999".into()), &tx));
        assert!(controller.cards[0].expanded);
    }

    #[tokio::test]
    async fn leaving_course_list_clears_expansion() {
        let mut controller = controller_with(Arc::new(MemoryBackend::new())).await;
        let (tx, _rx) = mpsc::unbounded_channel();

        controller.on_flag(true);
        controller.on_action(Action::ToggleCourse("CS201".into()), &tx);
        controller.on_flag(false);
        controller.on_flag(true);

        assert!(controller.cards.iter().all(|c| !c.expanded));
    }

    #[tokio::test]
    async fn second_transition_waits_for_pending_write() {
        let backend = Arc::new(MemoryBackend::new());
        let mut controller = controller_with(backend).await;
        let (tx, _rx) = mpsc::unbounded_channel();

        controller.on_action(Action::Continue, &tx);
        assert_eq!(controller.pending_write, Some(true));

        controller.on_action(Action::Continue, &tx);
        assert_eq!(controller.pending_write, Some(true));

        controller.on_flag(true);
        assert_eq!(controller.pending_write, None);
        assert_eq!(controller.screen(), Screen::CourseList);
    }

    #[tokio::test]
    async fn failed_write_clears_pending_and_keeps_screen() {
        let mut controller = controller_with(Arc::new(MemoryBackend::new())).await;
        controller.pending_write = Some(true);

        controller.on_write_outcome(WriteOutcome {
            completed: true,
            result: Err(StorageError::Query("disk gone".into())),
        });

        assert_eq!(controller.pending_write, None);
        assert_eq!(controller.screen(), Screen::Onboarding);
    }
}
