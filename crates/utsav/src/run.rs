use std::time::{Duration, Instant};

use anyhow::Result;
use backdrop::{Backdrop, BackdropConfig, KeyPress, WindowRuntime, WindowSignal};
use microsite::{
    NullOutput, Page, PageChange, PageEnvironment, PageEvent, PageKey, Theme,
};
use siteconfig::{GpuPowerSetting, SiteConfig};
use tracing_subscriber::EnvFilter;

use crate::bootstrap::{bootstrap_filesystem, load_site_config, parse_surface_size};
use crate::cli::RunArgs;
use crate::commands::{catalogue, Clock};
use crate::paths::AppPaths;

const DEFAULT_SURFACE: (u32, u32) = (1280, 720);

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(args: RunArgs, clock: Clock) -> Result<()> {
    let paths = AppPaths::discover()?;
    let mut state = bootstrap_filesystem(&paths)?;
    let site = load_site_config(&paths)?;
    let catalogue = catalogue(site.as_ref())?;
    let config = backdrop_config(&args, site.as_ref())?;
    let tick_interval = site
        .as_ref()
        .map(|site| site.countdown.interval)
        .unwrap_or_else(|| siteconfig::CountdownSettings::default().interval);

    tracing::debug!(
        config = %paths.config_dir().display(),
        data = %paths.data_dir().display(),
        cache = %paths.cache_dir().display(),
        events = catalogue.len(),
        "resolved utsav paths"
    );

    let mut page = Page::new(
        &mut state,
        catalogue,
        NullOutput::default(),
        PageEnvironment {
            prefers_dark: args.prefers_dark,
            hour: clock.hour(),
            page_height: config.page_height,
            viewport_width: f64::from(config.surface_size.0),
        },
    );

    let initial = BackdropConfig {
        initial_backdrop: backdrop_for(page.theme()),
        ..config
    };
    tracing::info!(
        size = ?initial.surface_size,
        fps = ?initial.target_fps,
        theme = %page.theme(),
        language = %page.language(),
        "starting utsav"
    );
    let window = WindowRuntime::spawn(initial)?;

    page.dispatch(PageEvent::Tick, clock.now());
    let mut next_tick = Instant::now() + tick_interval;
    loop {
        let timeout = next_tick.saturating_duration_since(Instant::now());
        match window.next_signal(timeout) {
            Some(WindowSignal::Closed) => break,
            Some(signal) => {
                if let Some(event) = page_event(signal) {
                    let changes = page.dispatch(event, clock.now());
                    apply_changes(&page, &window, &changes)?;
                }
            }
            None => {}
        }

        if Instant::now() >= next_tick {
            page.dispatch(PageEvent::Tick, clock.now());
            if let Some(view) = page.modal().view() {
                if let Some(countdown) = view.countdown {
                    tracing::debug!(id = view.id, %countdown, "countdown");
                }
            }
            next_tick += tick_interval;
            // Skip missed ticks rather than replaying them.
            if next_tick < Instant::now() {
                next_tick = Instant::now() + tick_interval;
            }
        }
    }

    drop(page);
    window.shutdown()?;
    state.persist_if_changed(&paths.state_file())?;
    tracing::info!("utsav closed");
    Ok(())
}

fn backdrop_config(args: &RunArgs, site: Option<&SiteConfig>) -> Result<BackdropConfig> {
    let defaults = BackdropConfig::default();
    let settings = site.map(|site| &site.backdrop);

    let surface_size = match args.size.as_deref() {
        Some(size) => parse_surface_size(size)?,
        None => site
            .and_then(SiteConfig::surface_size)
            .unwrap_or(DEFAULT_SURFACE),
    };

    let target_fps = match args.fps.or(settings.and_then(|s| s.fps)) {
        Some(fps) if fps > 0.0 => Some(fps),
        _ => None,
    };

    let gpu_power = args
        .gpu_power
        .or(settings
            .and_then(|s| s.gpu_power)
            .map(|power| match power {
                GpuPowerSetting::Low => backdrop::GpuPowerPreference::Low,
                GpuPowerSetting::High => backdrop::GpuPowerPreference::High,
            }))
        .unwrap_or(defaults.gpu_power);

    let page_height = args
        .page_height
        .or(settings.and_then(|s| s.page_height))
        .filter(|height| height.is_finite() && *height >= 0.0)
        .unwrap_or(defaults.page_height);

    Ok(BackdropConfig {
        surface_size,
        target_fps,
        gpu_power,
        page_height,
        ..defaults
    })
}

fn backdrop_for(theme: Theme) -> Backdrop {
    match theme {
        Theme::Dark => Backdrop::Dark,
        Theme::Light => Backdrop::Light,
    }
}

fn page_event(signal: WindowSignal) -> Option<PageEvent> {
    match signal {
        WindowSignal::SystemTheme { dark } => Some(PageEvent::SystemTheme { dark }),
        WindowSignal::Key(KeyPress::Escape) => Some(PageEvent::Key(PageKey::Escape)),
        WindowSignal::Key(KeyPress::ArrowLeft) => Some(PageEvent::Key(PageKey::Left)),
        WindowSignal::Key(KeyPress::ArrowRight) => Some(PageEvent::Key(PageKey::Right)),
        WindowSignal::Key(KeyPress::Character(c)) => Some(PageEvent::Key(PageKey::Char(c))),
        WindowSignal::Scrolled { offset, .. } => Some(PageEvent::Scrolled { offset }),
        WindowSignal::Clicked => Some(PageEvent::Clicked),
        WindowSignal::Closed => None,
    }
}

fn apply_changes<S, O>(
    page: &Page<S, O>,
    window: &WindowRuntime,
    changes: &[PageChange],
) -> Result<()>
where
    S: microsite::PreferenceStore,
    O: microsite::AudioOutput,
{
    for change in changes {
        match change {
            PageChange::Theme(theme) => {
                window.set_backdrop(backdrop_for(*theme))?;
                tracing::info!(%theme, icon = theme.icon(), "theme");
            }
            PageChange::Language(language) => {
                tracing::info!(%language, label = %language.label(), "language");
            }
            PageChange::ModalOpened(id) => {
                if let Some(view) = page.modal().view() {
                    tracing::info!(
                        id,
                        title = %view.title,
                        date = %view.date,
                        time = %view.time,
                        venue = %view.venue,
                        countdown = ?view.countdown.map(|c| c.to_string()),
                        "event opened"
                    );
                }
            }
            PageChange::ModalClosed => tracing::info!("event closed"),
            PageChange::Audio(icon) => tracing::info!(icon = icon.class(), "audio"),
            PageChange::Nav(change) => tracing::debug!(?change, "navigation"),
            PageChange::ScrollTo(offset) => tracing::debug!(offset, "scroll requested"),
            PageChange::Carousel(offset) => tracing::debug!(offset, "event strip moved"),
            PageChange::CountdownsRefreshed => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop::GpuPowerPreference;

    #[test]
    fn cli_flags_override_site_settings() {
        let site = SiteConfig::from_toml_str(
            "version = 1\n[backdrop]\nfps = 30\nwidth = 1920\nheight = 1080\ngpu_power = \"high\"\npage_height = 6000\n",
        )
        .unwrap();

        let from_site = backdrop_config(&RunArgs::default(), Some(&site)).unwrap();
        assert_eq!(from_site.surface_size, (1920, 1080));
        assert_eq!(from_site.target_fps, Some(30.0));
        assert_eq!(from_site.gpu_power, GpuPowerPreference::High);
        assert_eq!(from_site.page_height, 6000.0);

        let args = RunArgs {
            size: Some("800x600".into()),
            fps: Some(0.0),
            gpu_power: Some(GpuPowerPreference::Low),
            page_height: None,
            prefers_dark: false,
        };
        let overridden = backdrop_config(&args, Some(&site)).unwrap();
        assert_eq!(overridden.surface_size, (800, 600));
        assert_eq!(overridden.target_fps, None);
        assert_eq!(overridden.gpu_power, GpuPowerPreference::Low);
    }

    #[test]
    fn window_signals_map_to_page_events() {
        assert_eq!(
            page_event(WindowSignal::Key(KeyPress::Character('t'))),
            Some(PageEvent::Key(PageKey::Char('t')))
        );
        assert_eq!(
            page_event(WindowSignal::Scrolled {
                offset: 120.0,
                viewport_height: 720
            }),
            Some(PageEvent::Scrolled { offset: 120.0 })
        );
        assert_eq!(
            page_event(WindowSignal::Key(KeyPress::ArrowRight)),
            Some(PageEvent::Key(PageKey::Right))
        );
        assert_eq!(page_event(WindowSignal::Clicked), Some(PageEvent::Clicked));
        assert_eq!(page_event(WindowSignal::Closed), None);
    }
}
