use std::thread;

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDateTime, Timelike};
use microsite::{
    Countdown, EventCatalogue, EventModal, JoinForm, Language, LanguageController,
    NewsletterForm, ThemeController,
};
use serde::Serialize;
use siteconfig::SiteConfig;

use crate::bootstrap::{bootstrap_filesystem, load_site_config};
use crate::cli::{CountdownArgs, EventsAction, ToggleAction};
use crate::paths::AppPaths;

/// Local wall-clock time, or the `--now` override.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clock {
    fixed: Option<NaiveDateTime>,
}

impl Clock {
    pub fn new(fixed: Option<NaiveDateTime>) -> Self {
        Self { fixed }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.fixed.unwrap_or_else(|| Local::now().naive_local())
    }

    pub fn hour(&self) -> u32 {
        self.now().hour()
    }
}

pub fn theme(action: ToggleAction, clock: Clock) -> Result<()> {
    let paths = AppPaths::discover()?;
    let mut state = bootstrap_filesystem(&paths)?;
    let mut controller = ThemeController::init(&state, false, clock.hour());

    if action == ToggleAction::Toggle {
        controller.toggle(&mut state);
        state.persist_if_changed(&paths.state_file())?;
    }

    println!("{} ({})", controller.theme(), controller.icon());
    Ok(())
}

pub fn lang(action: ToggleAction) -> Result<()> {
    let paths = AppPaths::discover()?;
    let mut state = bootstrap_filesystem(&paths)?;
    let mut controller = LanguageController::init(&state);

    if action == ToggleAction::Toggle {
        controller.toggle(&mut state);
        state.persist_if_changed(&paths.state_file())?;
    }

    println!("{}", controller.label());
    Ok(())
}

#[derive(Debug, Serialize)]
struct EventListing<'a> {
    #[serde(flatten)]
    event: &'a microsite::Event,
    starts_at: Option<String>,
    countdown: String,
}

pub fn events(action: EventsAction, clock: Clock) -> Result<()> {
    let paths = AppPaths::discover()?;
    let state = bootstrap_filesystem(&paths)?;
    let site = load_site_config(&paths)?;
    let catalogue = catalogue(site.as_ref())?;
    let language = LanguageController::init(&state).language();
    let now = clock.now();

    match action {
        EventsAction::List { json } => {
            if json {
                let listings: Vec<EventListing<'_>> = catalogue
                    .iter()
                    .map(|event| {
                        let starts_at = event.starts_at().ok();
                        EventListing {
                            event,
                            starts_at: starts_at
                                .map(|at| at.format("%Y-%m-%dT%H:%M:%S").to_string()),
                            countdown: countdown_label(starts_at.map(|at| Countdown::until(at, now))),
                        }
                    })
                    .collect();
                let rendered = serde_json::to_string_pretty(&listings)
                    .context("failed to serialise event listing")?;
                println!("{rendered}");
            } else {
                for event in catalogue.iter() {
                    println!(
                        "{:>3}  {:<32} {:<16} {:<9} {}",
                        event.id,
                        event.title.get(language),
                        event.date,
                        event.time,
                        event.venue.get(language)
                    );
                }
            }
        }
        EventsAction::Show { id } => {
            let mut modal = EventModal::new();
            if !modal.open(&catalogue, id, language, now) {
                return Err(anyhow!("no event with id {id}"));
            }
            let view = modal
                .view()
                .ok_or_else(|| anyhow!("event {id} did not render"))?;
            println!("{}", view.title);
            println!("  date:      {}", view.date);
            println!("  time:      {}", view.time);
            println!("  venue:     {}", view.venue);
            if let Some(organizer) = &view.organizer {
                println!("  organizer: {organizer}");
            }
            if !view.image.is_empty() {
                println!("  image:     {}", view.image);
            }
            println!("  countdown: {}", countdown_label(view.countdown));
            println!();
            println!("{}", view.description);
        }
    }
    Ok(())
}

pub fn join(name: String, email: String) -> Result<()> {
    let mut form = JoinForm { name, email };
    let message = form.submit().context("join form rejected")?;
    println!("{message}");
    Ok(())
}

pub fn newsletter(email: String) -> Result<()> {
    let mut form = NewsletterForm { email };
    let message = form.submit().context("newsletter form rejected")?;
    println!("{message}");
    Ok(())
}

pub fn countdown(args: CountdownArgs, clock: Clock) -> Result<()> {
    let paths = AppPaths::discover()?;
    let state = bootstrap_filesystem(&paths)?;
    let site = load_site_config(&paths)?;
    let catalogue = catalogue(site.as_ref())?;
    let language = LanguageController::init(&state).language();
    let interval = site
        .as_ref()
        .map(|config| config.countdown.interval)
        .unwrap_or_else(|| siteconfig::CountdownSettings::default().interval);

    let mut board = catalogue.countdowns();
    let mut ticks = 0u64;
    loop {
        board.tick(clock.now());
        print_board(&catalogue, &board, language);
        ticks += 1;

        let done = !args.watch || args.ticks.is_some_and(|limit| ticks >= limit);
        if done {
            return Ok(());
        }
        println!();
        thread::sleep(interval);
    }
}

pub fn show_paths(clock: Clock) -> Result<()> {
    let paths = AppPaths::discover()?;
    let state = bootstrap_filesystem(&paths)?;
    println!("Configuration directories:");
    println!("  config:     {}", paths.config_dir().display());
    println!("  data:       {}", paths.data_dir().display());
    println!("  cache:      {}", paths.cache_dir().display());
    println!("  state:      {}", paths.state_file().display());
    let site_file = paths.site_file();
    println!(
        "  site:       {}{}",
        site_file.display(),
        if site_file.exists() { "" } else { " (missing)" }
    );
    let theme = ThemeController::init(&state, false, clock.hour()).theme();
    let language = LanguageController::init(&state).language();
    println!("Preferences: theme={theme} language={language}");
    Ok(())
}

pub fn catalogue(site: Option<&SiteConfig>) -> Result<EventCatalogue> {
    EventCatalogue::from_site(site).context("failed to build event catalogue from site config")
}

fn print_board(
    catalogue: &EventCatalogue,
    board: &microsite::CountdownBoard,
    language: Language,
) {
    for event in catalogue.iter() {
        println!(
            "{:>3}  {:<32} {}",
            event.id,
            event.title.get(language),
            countdown_label(board.get(event.id))
        );
    }
}

fn countdown_label(countdown: Option<Countdown>) -> String {
    match countdown {
        Some(countdown) => countdown.to_string(),
        None => "unknown start".to_string(),
    }
}
