//! Scroll-driven navigation state: active link, navbar, landing fade, section
//! glow and the event carousel.

/// Offset applied to both sides of the active-section test.
pub const ACTIVE_OFFSET: f64 = 100.0;
/// Clearance left above a section when a nav link scrolls to it.
pub const NAV_CLEARANCE: f64 = 80.0;
pub const NAVBAR_SOLID_AFTER: f64 = 50.0;
pub const LANDING_FADE_RATIO: f64 = 0.3;
pub const CAROUSEL_GAP: f64 = 20.0;
pub const CAROUSEL_CARDS_PER_STEP: f64 = 3.0;
pub const EVENT_CARD_WIDTH: f64 = 280.0;

pub const DEFAULT_SECTIONS: [&str; 5] = ["home", "about", "events", "join", "contact"];

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl Section {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }
}

/// Splits `page_height` evenly between `ids`, top to bottom.
pub fn even_layout(ids: &[&str], page_height: f64) -> Vec<Section> {
    if ids.is_empty() {
        return Vec::new();
    }
    let height = page_height.max(0.0) / ids.len() as f64;
    ids.iter()
        .enumerate()
        .map(|(index, id)| Section::new(*id, index as f64 * height, height))
        .collect()
}

/// Section whose shifted range `[top - 100, top - 100 + height)` holds
/// `scroll_y + 100`. Later sections win over earlier ones.
pub fn active_section(sections: &[Section], scroll_y: f64) -> Option<&str> {
    let marker = scroll_y + ACTIVE_OFFSET;
    sections
        .iter()
        .filter(|section| {
            let start = section.top - ACTIVE_OFFSET;
            marker >= start && marker < start + section.height
        })
        .last()
        .map(|section| section.id.as_str())
}

pub fn scroll_target(section_top: f64) -> f64 {
    (section_top - NAV_CLEARANCE).max(0.0)
}

pub fn navbar_solid(scroll_y: f64) -> bool {
    scroll_y > NAVBAR_SOLID_AFTER
}

pub fn landing_scrolled(scroll_y: f64, landing_height: f64) -> bool {
    scroll_y > landing_height * LANDING_FADE_RATIO
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.left + self.width && y >= self.top && y < self.top + self.height
    }
}

/// Glow centre for a pointer over `rect`, as percentages of its size pushed
/// 10% further from the middle. `None` when the pointer is outside.
pub fn section_glow(rect: Rect, x: f64, y: f64) -> Option<(f64, f64)> {
    if rect.width <= 0.0 || rect.height <= 0.0 || !rect.contains(x, y) {
        return None;
    }
    let px = (x - rect.left) / rect.width * 100.0;
    let py = (y - rect.top) / rect.height * 100.0;
    Some((px + (px - 50.0) * 0.1, py + (py - 50.0) * 0.1))
}

pub fn carousel_step(card_width: f64) -> f64 {
    (card_width + CAROUSEL_GAP) * CAROUSEL_CARDS_PER_STEP
}

/// Horizontal position of the event card strip.
#[derive(Debug, Clone)]
pub struct Carousel {
    offset: f64,
    step: f64,
    max_offset: f64,
}

impl Carousel {
    pub fn new(card_width: f64, cards: usize, visible_width: f64) -> Self {
        let content = cards as f64 * (card_width + CAROUSEL_GAP) - CAROUSEL_GAP;
        Self {
            offset: 0.0,
            step: carousel_step(card_width),
            max_offset: (content - visible_width).max(0.0),
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn scroll_left(&mut self) -> f64 {
        self.offset = (self.offset - self.step).clamp(0.0, self.max_offset);
        self.offset
    }

    pub fn scroll_right(&mut self) -> f64 {
        self.offset = (self.offset + self.step).clamp(0.0, self.max_offset);
        self.offset
    }
}

/// Navigation state derived from the page scroll position.
#[derive(Debug, Clone)]
pub struct Navigation {
    sections: Vec<Section>,
    landing_height: f64,
    active: Option<String>,
    navbar_solid: bool,
    landing_scrolled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavChange {
    Active(String),
    NavbarSolid(bool),
    LandingScrolled(bool),
}

impl Navigation {
    /// The first section is treated as the landing section.
    pub fn new(sections: Vec<Section>) -> Self {
        let landing_height = sections.first().map_or(0.0, |section| section.height);
        let mut nav = Self {
            sections,
            landing_height,
            active: None,
            navbar_solid: false,
            landing_scrolled: false,
        };
        nav.on_scroll(0.0);
        nav
    }

    pub fn with_page_height(page_height: f64) -> Self {
        Self::new(even_layout(&DEFAULT_SECTIONS, page_height))
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn navbar_is_solid(&self) -> bool {
        self.navbar_solid
    }

    pub fn landing_is_scrolled(&self) -> bool {
        self.landing_scrolled
    }

    /// Recomputes state for a new scroll position. A position that falls in
    /// no section keeps the previous highlight.
    pub fn on_scroll(&mut self, scroll_y: f64) -> Vec<NavChange> {
        let mut changes = Vec::new();

        if let Some(id) = active_section(&self.sections, scroll_y) {
            if self.active.as_deref() != Some(id) {
                self.active = Some(id.to_string());
                changes.push(NavChange::Active(id.to_string()));
            }
        }

        let solid = navbar_solid(scroll_y);
        if solid != self.navbar_solid {
            self.navbar_solid = solid;
            changes.push(NavChange::NavbarSolid(solid));
        }

        let scrolled = landing_scrolled(scroll_y, self.landing_height);
        if scrolled != self.landing_scrolled {
            self.landing_scrolled = scrolled;
            changes.push(NavChange::LandingScrolled(scrolled));
        }

        changes
    }

    /// Handles a nav link click; returns the scroll offset to move to.
    pub fn click(&mut self, id: &str) -> Option<f64> {
        let section = self.sections.iter().find(|section| section.id == id)?;
        let target = scroll_target(section.top);
        self.active = Some(section.id.clone());
        Some(target)
    }
}
