use chrono::NaiveDateTime;

use crate::audio::{AudioControl, AudioIcon, AudioOutput};
use crate::countdown::{Countdown, CountdownBoard};
use crate::events::EventCatalogue;
use crate::language::{Language, LanguageController};
use crate::modal::{EventModal, ModalClick};
use crate::nav::{Carousel, NavChange, Navigation, EVENT_CARD_WIDTH};
use crate::prefs::PreferenceStore;
use crate::theme::{Theme, ThemeController};

/// Facts about the host that decide the initial page state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageEnvironment {
    pub prefers_dark: bool,
    /// Local hour, 0-23.
    pub hour: u32,
    pub page_height: f64,
    /// Width available to the event card strip.
    pub viewport_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKey {
    Escape,
    Left,
    Right,
    Char(char),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    Scrolled { offset: f64 },
    Key(PageKey),
    NavClicked(String),
    CardClicked(u32),
    ModalClicked(ModalClick),
    /// Any click on the page; the first one may start the audio. With the
    /// modal open it lands on the overlay.
    Clicked,
    SystemTheme { dark: bool },
    ToggleTheme,
    ToggleLanguage,
    ToggleAudio,
    Tick,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageChange {
    Theme(Theme),
    Language(Language),
    Nav(NavChange),
    ScrollTo(f64),
    /// New horizontal offset of the event card strip.
    Carousel(f64),
    ModalOpened(u32),
    ModalClosed,
    Audio(AudioIcon),
    CountdownsRefreshed,
}

/// The whole interactive page over one preference store.
pub struct Page<S, O> {
    store: S,
    theme: ThemeController,
    language: LanguageController,
    nav: Navigation,
    carousel: Carousel,
    catalogue: EventCatalogue,
    countdowns: CountdownBoard,
    modal: EventModal,
    audio: AudioControl<O>,
}

impl<S, O> Page<S, O>
where
    S: PreferenceStore,
    O: AudioOutput,
{
    pub fn new(store: S, catalogue: EventCatalogue, output: O, env: PageEnvironment) -> Self {
        let theme = ThemeController::init(&store, env.prefers_dark, env.hour);
        let language = LanguageController::init(&store);
        let countdowns = catalogue.countdowns();
        tracing::debug!(
            theme = %theme.theme(),
            language = %language.language(),
            events = catalogue.len(),
            "page initialised"
        );
        Self {
            store,
            theme,
            language,
            nav: Navigation::with_page_height(env.page_height),
            carousel: Carousel::new(EVENT_CARD_WIDTH, catalogue.len(), env.viewport_width),
            catalogue,
            countdowns,
            modal: EventModal::new(),
            audio: AudioControl::new(output),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme.theme()
    }

    pub fn language(&self) -> Language {
        self.language.language()
    }

    pub fn nav(&self) -> &Navigation {
        &self.nav
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn catalogue(&self) -> &EventCatalogue {
        &self.catalogue
    }

    pub fn modal(&self) -> &EventModal {
        &self.modal
    }

    pub fn audio(&self) -> &AudioControl<O> {
        &self.audio
    }

    pub fn countdown(&self, id: u32) -> Option<Countdown> {
        self.countdowns.get(id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn dispatch(&mut self, event: PageEvent, now: NaiveDateTime) -> Vec<PageChange> {
        tracing::trace!(?event, "page event");
        match event {
            PageEvent::Scrolled { offset } => {
                if self.modal.scroll_locked() {
                    return Vec::new();
                }
                self.nav
                    .on_scroll(offset)
                    .into_iter()
                    .map(PageChange::Nav)
                    .collect()
            }
            PageEvent::Key(key) => self.key(key, now),
            PageEvent::NavClicked(id) => match self.nav.click(&id) {
                Some(target) => vec![
                    PageChange::Nav(NavChange::Active(id)),
                    PageChange::ScrollTo(target),
                ],
                None => Vec::new(),
            },
            PageEvent::CardClicked(id) => self.open_event(id, now),
            PageEvent::ModalClicked(target) => {
                if self.modal.on_click(target) {
                    vec![PageChange::ModalClosed]
                } else {
                    Vec::new()
                }
            }
            PageEvent::Clicked => {
                let mut changes = Vec::new();
                if self.audio.first_interaction() {
                    changes.push(PageChange::Audio(self.audio.icon()));
                }
                if self.modal.is_open() {
                    let overlay = PageEvent::ModalClicked(ModalClick::Overlay);
                    changes.extend(self.dispatch(overlay, now));
                }
                changes
            }
            PageEvent::SystemTheme { dark } => {
                if self.theme.system_changed(&self.store, dark) {
                    vec![PageChange::Theme(self.theme.theme())]
                } else {
                    Vec::new()
                }
            }
            PageEvent::ToggleTheme => vec![PageChange::Theme(self.theme.toggle(&mut self.store))],
            PageEvent::ToggleLanguage => {
                let language = self.language.toggle(&mut self.store);
                self.modal.refresh(&self.catalogue, language, now);
                vec![PageChange::Language(language)]
            }
            PageEvent::ToggleAudio => vec![PageChange::Audio(self.audio.toggle())],
            PageEvent::Tick => {
                self.countdowns.tick(now);
                if let Some(id) = self.modal.view().map(|view| view.id) {
                    if let Some(countdown) = self.countdowns.get(id) {
                        self.modal.update_countdown(countdown);
                    }
                }
                vec![PageChange::CountdownsRefreshed]
            }
        }
    }

    fn key(&mut self, key: PageKey, now: NaiveDateTime) -> Vec<PageChange> {
        match key {
            PageKey::Escape => {
                if self.modal.on_escape() {
                    vec![PageChange::ModalClosed]
                } else {
                    Vec::new()
                }
            }
            PageKey::Left if !self.modal.is_open() => {
                let before = self.carousel.offset();
                let after = self.carousel.scroll_left();
                carousel_change(before, after)
            }
            PageKey::Right if !self.modal.is_open() => {
                let before = self.carousel.offset();
                let after = self.carousel.scroll_right();
                carousel_change(before, after)
            }
            PageKey::Left | PageKey::Right => Vec::new(),
            PageKey::Char(c) => match c.to_ascii_lowercase() {
                't' => self.dispatch(PageEvent::ToggleTheme, now),
                'l' => self.dispatch(PageEvent::ToggleLanguage, now),
                'm' => self.dispatch(PageEvent::ToggleAudio, now),
                '0' => self.open_event(10, now),
                digit @ '1'..='9' => match digit.to_digit(10) {
                    Some(id) => self.open_event(id, now),
                    None => Vec::new(),
                },
                _ => Vec::new(),
            },
        }
    }

    fn open_event(&mut self, id: u32, now: NaiveDateTime) -> Vec<PageChange> {
        if self
            .modal
            .open(&self.catalogue, id, self.language.language(), now)
        {
            vec![PageChange::ModalOpened(id)]
        } else {
            Vec::new()
        }
    }
}

fn carousel_change(before: f64, after: f64) -> Vec<PageChange> {
    if after == before {
        Vec::new()
    } else {
        vec![PageChange::Carousel(after)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullOutput;
    use crate::prefs::{MemoryStore, LANGUAGE_KEY, THEME_KEY};
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn environment() -> PageEnvironment {
        PageEnvironment {
            prefers_dark: false,
            hour: 12,
            page_height: 4000.0,
            viewport_width: 1000.0,
        }
    }

    fn page(store: MemoryStore) -> Page<MemoryStore, NullOutput> {
        Page::new(
            store,
            EventCatalogue::builtin(),
            NullOutput::default(),
            environment(),
        )
    }

    #[test]
    fn keys_drive_toggles_and_modal() {
        let mut page = page(MemoryStore::new());
        assert_eq!(page.theme(), Theme::Light);

        assert_eq!(
            page.dispatch(PageEvent::Key(PageKey::Char('t')), now()),
            vec![PageChange::Theme(Theme::Dark)]
        );
        assert_eq!(
            page.dispatch(PageEvent::Key(PageKey::Char('L')), now()),
            vec![PageChange::Language(Language::Hindi)]
        );
        assert_eq!(
            page.dispatch(PageEvent::Key(PageKey::Char('0')), now()),
            vec![PageChange::ModalOpened(10)]
        );
        assert_eq!(
            page.modal().view().map(|view| view.title.as_str()),
            Some("Hindi Film Festival")
        );
        assert_eq!(
            page.dispatch(PageEvent::Key(PageKey::Escape), now()),
            vec![PageChange::ModalClosed]
        );
        assert_eq!(page.dispatch(PageEvent::Key(PageKey::Escape), now()), Vec::new());

        let store = page.into_store();
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(store.get(LANGUAGE_KEY).as_deref(), Some("hi"));
    }

    #[test]
    fn modal_locks_scroll_tracking() {
        let mut page = page(MemoryStore::new());
        page.dispatch(PageEvent::CardClicked(2), now());
        assert_eq!(page.dispatch(PageEvent::Scrolled { offset: 2000.0 }, now()), Vec::new());
        assert_eq!(page.nav().active(), Some("home"));

        page.dispatch(PageEvent::ModalClicked(ModalClick::Overlay), now());
        let changes = page.dispatch(PageEvent::Scrolled { offset: 2000.0 }, now());
        assert!(changes.contains(&PageChange::Nav(NavChange::Active("events".into()))));
    }

    #[test]
    fn tick_refreshes_open_modal_countdown() {
        let mut page = page(MemoryStore::new());
        page.dispatch(PageEvent::CardClicked(1), now());
        let later = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(17, 59, 0)
            .unwrap();
        page.dispatch(PageEvent::Tick, later);

        let expected = Countdown::Remaining {
            days: 0,
            hours: 0,
            minutes: 1,
            seconds: 0,
        };
        assert_eq!(page.countdown(1), Some(expected));
        assert_eq!(page.modal().view().unwrap().countdown, Some(expected));
    }

    #[test]
    fn first_click_starts_audio_once() {
        let mut page = page(MemoryStore::new());
        assert_eq!(
            page.dispatch(PageEvent::Clicked, now()),
            vec![PageChange::Audio(AudioIcon::VolumeUp)]
        );
        assert_eq!(page.dispatch(PageEvent::Clicked, now()), Vec::new());
        assert_eq!(
            page.dispatch(PageEvent::Key(PageKey::Char('m')), now()),
            vec![PageChange::Audio(AudioIcon::VolumeMute)]
        );
    }

    #[test]
    fn nav_click_scrolls_below_the_navbar() {
        let mut page = page(MemoryStore::new());
        assert_eq!(
            page.dispatch(PageEvent::NavClicked("events".into()), now()),
            vec![
                PageChange::Nav(NavChange::Active("events".into())),
                PageChange::ScrollTo(1520.0),
            ]
        );
    }

    #[test]
    fn startup_system_report_keeps_night_theme() {
        let mut page = Page::new(
            MemoryStore::new(),
            EventCatalogue::builtin(),
            NullOutput::default(),
            PageEnvironment {
                hour: 22,
                ..environment()
            },
        );
        assert_eq!(page.theme(), Theme::Dark);
        assert_eq!(
            page.dispatch(PageEvent::SystemTheme { dark: false }, now()),
            Vec::new()
        );
        assert_eq!(page.theme(), Theme::Dark);

        assert_eq!(
            page.dispatch(PageEvent::SystemTheme { dark: true }, now()),
            Vec::new()
        );
        assert_eq!(
            page.dispatch(PageEvent::SystemTheme { dark: false }, now()),
            vec![PageChange::Theme(Theme::Light)]
        );
    }

    #[test]
    fn click_with_modal_open_closes_it() {
        let mut page = page(MemoryStore::new());
        page.dispatch(PageEvent::CardClicked(3), now());
        assert_eq!(
            page.dispatch(PageEvent::Clicked, now()),
            vec![
                PageChange::Audio(AudioIcon::VolumeUp),
                PageChange::ModalClosed
            ]
        );
        assert!(!page.modal().is_open());
        assert_eq!(page.dispatch(PageEvent::Clicked, now()), Vec::new());
    }

    #[test]
    fn arrow_keys_move_the_card_strip() {
        let mut page = page(MemoryStore::new());
        assert_eq!(page.dispatch(PageEvent::Key(PageKey::Left), now()), Vec::new());
        assert_eq!(
            page.dispatch(PageEvent::Key(PageKey::Right), now()),
            vec![PageChange::Carousel(900.0)]
        );

        page.dispatch(PageEvent::CardClicked(1), now());
        assert_eq!(page.dispatch(PageEvent::Key(PageKey::Right), now()), Vec::new());
        page.dispatch(PageEvent::Key(PageKey::Escape), now());

        assert_eq!(
            page.dispatch(PageEvent::Key(PageKey::Left), now()),
            vec![PageChange::Carousel(0.0)]
        );
        assert_eq!(page.carousel().offset(), 0.0);
    }
}
