//! Headless model of the Utsav event page.
//!
//! Everything a visitor can toggle or click lives here as plain state:
//! theme and language (persisted through a [`PreferenceStore`]), scroll-driven
//! navigation, event countdowns, the event modal, background audio and the
//! two sign-up forms. [`Page`] ties them together and turns [`PageEvent`]s
//! into [`PageChange`]s for whoever renders the result.

pub mod audio;
pub mod countdown;
pub mod events;
pub mod forms;
pub mod language;
pub mod modal;
pub mod nav;
pub mod page;
pub mod prefs;
pub mod theme;

pub use audio::{AudioControl, AudioIcon, AudioOutput, NullOutput, PlaybackRejected};
pub use countdown::{Countdown, CountdownBoard, CountdownError};
pub use events::{Event, EventCatalogue, LocalizedText};
pub use forms::{FormError, JoinForm, NewsletterForm};
pub use language::{Language, LanguageController};
pub use modal::{EventModal, ModalClick, ModalView};
pub use nav::{Carousel, NavChange, Navigation};
pub use page::{Page, PageChange, PageEnvironment, PageEvent, PageKey};
pub use prefs::{MemoryStore, PreferenceStore};
pub use theme::{Theme, ThemeController};
