use chrono::NaiveDateTime;
use serde::Serialize;
use siteconfig::{EventEntry, TextEntry};

use crate::countdown::{parse_event_start, parse_timestamp, CountdownBoard, CountdownError};
use crate::language::Language;

/// Text with a required English form and an optional Hindi one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedText {
    pub en: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hi: Option<String>,
}

impl LocalizedText {
    pub fn english(text: impl Into<String>) -> Self {
        Self {
            en: text.into(),
            hi: None,
        }
    }

    pub fn bilingual(en: impl Into<String>, hi: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            hi: Some(hi.into()),
        }
    }

    /// Falls back to English when no Hindi text exists.
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::Hindi => self.hi.as_deref().unwrap_or(&self.en),
            Language::English => &self.en,
        }
    }
}

impl From<&TextEntry> for LocalizedText {
    fn from(entry: &TextEntry) -> Self {
        Self {
            en: entry.english().to_string(),
            hi: entry.hindi().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: u32,
    pub title: LocalizedText,
    pub image: String,
    pub date: String,
    pub time: String,
    pub venue: LocalizedText,
    pub description: LocalizedText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer: Option<LocalizedText>,
    #[serde(skip)]
    starts_at: Option<NaiveDateTime>,
}

impl Event {
    fn listed(
        id: u32,
        title: &str,
        image: &str,
        date: &str,
        time: &str,
        venue: &str,
        description: &str,
    ) -> Self {
        Self {
            id,
            title: LocalizedText::english(title),
            image: image.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            venue: LocalizedText::english(venue),
            description: LocalizedText::english(description),
            organizer: None,
            starts_at: None,
        }
    }

    /// Local start time: the explicit timestamp when one was configured,
    /// otherwise the display date and time.
    pub fn starts_at(&self) -> Result<NaiveDateTime, CountdownError> {
        match self.starts_at {
            Some(at) => Ok(at),
            None => parse_event_start(&self.date, &self.time),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventCatalogue {
    events: Vec<Event>,
}

impl Default for EventCatalogue {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EventCatalogue {
    pub fn builtin() -> Self {
        let events = vec![
            Event::listed(
                1,
                "Cultural Night",
                "event1.jpg",
                "March 15, 2024",
                "6:00 PM",
                "Main Auditorium",
                "A night of cultural performances showcasing the rich heritage of India.",
            ),
            Event::listed(
                2,
                "Hindi Poetry Slam",
                "event2.jpg",
                "March 20, 2024",
                "4:00 PM",
                "Seminar Hall",
                "Express yourself through the beauty of Hindi poetry.",
            ),
            Event::listed(
                3,
                "Bollywood Dance Workshop",
                "event3.jpg",
                "March 25, 2024",
                "3:00 PM",
                "Dance Studio",
                "Learn the basics of Bollywood dance from professional instructors.",
            ),
            Event::listed(
                4,
                "Hindi Debate Competition",
                "event4.jpg",
                "April 1, 2024",
                "2:00 PM",
                "Debate Hall",
                "Showcase your debating skills in Hindi on contemporary topics.",
            ),
            Event::listed(
                5,
                "Indian Classical Music Concert",
                "event5.jpg",
                "April 5, 2024",
                "7:00 PM",
                "Music Hall",
                "Experience the magic of Indian classical music.",
            ),
            Event::listed(
                6,
                "Hindi Storytelling Session",
                "event6.jpg",
                "April 10, 2024",
                "5:00 PM",
                "Library",
                "Share and listen to captivating stories in Hindi.",
            ),
            Event::listed(
                7,
                "Indian Art Exhibition",
                "event7.jpg",
                "April 15, 2024",
                "11:00 AM",
                "Art Gallery",
                "Explore traditional and contemporary Indian art forms.",
            ),
            Event::listed(
                8,
                "Hindi Quiz Competition",
                "event8.jpg",
                "April 20, 2024",
                "3:00 PM",
                "Quiz Hall",
                "Test your knowledge of Hindi literature and culture.",
            ),
            Event::listed(
                9,
                "Indian Cuisine Workshop",
                "event9.jpg",
                "April 25, 2024",
                "4:00 PM",
                "Culinary Lab",
                "Learn to cook authentic Indian dishes.",
            ),
            Event::listed(
                10,
                "Hindi Film Festival",
                "event10.jpg",
                "May 1, 2024",
                "6:00 PM",
                "Movie Hall",
                "Screenings of classic and contemporary Hindi films.",
            ),
        ];
        Self { events }
    }

    /// Builds the catalogue from configured entries. Every entry must have a
    /// start time that parses, either explicit or from its display strings.
    pub fn from_entries(entries: &[EventEntry]) -> Result<Self, CountdownError> {
        let events = entries
            .iter()
            .map(|entry| {
                let starts_at = match entry.starts_at.as_deref() {
                    Some(raw) => parse_timestamp(raw)?,
                    None => parse_event_start(&entry.date, &entry.time)?,
                };
                Ok::<_, CountdownError>(Event {
                    id: entry.id,
                    title: (&entry.title).into(),
                    image: entry.image.clone(),
                    date: entry.date.clone(),
                    time: entry.time.clone(),
                    venue: (&entry.venue).into(),
                    description: (&entry.description).into(),
                    organizer: entry.organizer.as_ref().map(LocalizedText::from),
                    starts_at: Some(starts_at),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { events })
    }

    /// Configured events when there are any, the built-in list otherwise.
    pub fn from_site(config: Option<&siteconfig::SiteConfig>) -> Result<Self, CountdownError> {
        match config {
            Some(config) if !config.events.is_empty() => Self::from_entries(&config.events),
            _ => Ok(Self::builtin()),
        }
    }

    pub fn get(&self, id: u32) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Countdown board covering every event whose start time parses.
    pub fn countdowns(&self) -> CountdownBoard {
        let mut board = CountdownBoard::new();
        for event in &self.events {
            match event.starts_at() {
                Ok(at) => board.insert(event.id, at),
                Err(err) => tracing::warn!(id = event.id, %err, "event has no countdown"),
            }
        }
        board
    }
}
