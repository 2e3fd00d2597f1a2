use chrono::NaiveDateTime;

use crate::countdown::Countdown;
use crate::events::{Event, EventCatalogue};
use crate::language::Language;

/// Where a click inside the open modal landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalClick {
    CloseButton,
    /// The dimmed overlay around the dialog.
    Overlay,
    /// Anything inside the dialog itself.
    Content,
}

/// Fields shown in the dialog, already resolved to one language.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalView {
    pub id: u32,
    pub title: String,
    pub image: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub description: String,
    pub organizer: Option<String>,
    pub countdown: Option<Countdown>,
}

impl ModalView {
    fn render(event: &Event, language: Language, now: NaiveDateTime) -> Self {
        let countdown = match event.starts_at() {
            Ok(at) => Some(Countdown::until(at, now)),
            Err(err) => {
                tracing::warn!(id = event.id, %err, "modal opened without countdown");
                None
            }
        };
        Self {
            id: event.id,
            title: event.title.get(language).to_string(),
            image: event.image.clone(),
            date: event.date.clone(),
            time: event.time.clone(),
            venue: event.venue.get(language).to_string(),
            description: event.description.get(language).to_string(),
            organizer: event
                .organizer
                .as_ref()
                .map(|text| text.get(language).to_string()),
            countdown,
        }
    }
}

/// Event detail dialog. Page scrolling is locked exactly while it is open.
#[derive(Debug, Clone, Default)]
pub struct EventModal {
    view: Option<ModalView>,
}

impl EventModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.view.is_some()
    }

    pub fn scroll_locked(&self) -> bool {
        self.is_open()
    }

    pub fn view(&self) -> Option<&ModalView> {
        self.view.as_ref()
    }

    /// Shows event `id`; an unknown id leaves the modal untouched.
    pub fn open(
        &mut self,
        catalogue: &EventCatalogue,
        id: u32,
        language: Language,
        now: NaiveDateTime,
    ) -> bool {
        let Some(event) = catalogue.get(id) else {
            tracing::debug!(id, "no event with this id");
            return false;
        };
        self.view = Some(ModalView::render(event, language, now));
        tracing::debug!(id, "event modal opened");
        true
    }

    /// Returns whether the modal was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.view.take().is_some();
        if was_open {
            tracing::debug!("event modal closed");
        }
        was_open
    }

    pub fn on_click(&mut self, target: ModalClick) -> bool {
        match target {
            ModalClick::CloseButton | ModalClick::Overlay => self.close(),
            ModalClick::Content => false,
        }
    }

    pub fn on_escape(&mut self) -> bool {
        self.close()
    }

    /// Re-renders the open dialog, e.g. after a language switch.
    pub fn refresh(&mut self, catalogue: &EventCatalogue, language: Language, now: NaiveDateTime) {
        let Some(id) = self.view.as_ref().map(|view| view.id) else {
            return;
        };
        match catalogue.get(id) {
            Some(event) => self.view = Some(ModalView::render(event, language, now)),
            None => {
                self.view = None;
            }
        }
    }

    pub fn update_countdown(&mut self, countdown: Countdown) {
        if let Some(view) = self.view.as_mut() {
            view.countdown = Some(countdown);
        }
    }
}
