/// GPU adapter power preference requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpuPowerPreference {
    /// Prefer the integrated/low-power adapter; a decorative background rarely needs more.
    #[default]
    Low,
    High,
}

/// Colour scheme the backdrop clears to before the translucent wave is blended on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backdrop {
    #[default]
    Dark,
    Light,
}

impl Backdrop {
    pub(crate) fn clear_color(self) -> wgpu::Color {
        match self {
            Backdrop::Dark => wgpu::Color {
                r: 0.04,
                g: 0.04,
                b: 0.06,
                a: 1.0,
            },
            Backdrop::Light => wgpu::Color {
                r: 0.96,
                g: 0.95,
                b: 0.93,
                a: 1.0,
            },
        }
    }
}

/// Summary of the adapter wgpu picked, used to tune frame pacing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterProfile {
    pub name: String,
    pub backend: wgpu::Backend,
    pub device_type: wgpu::DeviceType,
}

impl AdapterProfile {
    pub(crate) fn from_wgpu(info: &wgpu::AdapterInfo) -> Self {
        Self {
            name: info.name.clone(),
            backend: info.backend,
            device_type: info.device_type,
        }
    }

    /// CPU rasterisers (llvmpipe, SwiftShader, WARP) report as `Cpu`.
    pub fn is_software(&self) -> bool {
        matches!(self.device_type, wgpu::DeviceType::Cpu)
            || self.name.to_ascii_lowercase().contains("llvmpipe")
    }
}

/// Immutable configuration passed to the window runtime at start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct BackdropConfig {
    /// Initial window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Optional FPS cap; `None` renders on every redraw opportunity.
    pub target_fps: Option<f32>,
    pub gpu_power: GpuPowerPreference,
    /// Height of the virtual page the mouse wheel scrolls through.
    pub page_height: f64,
    /// Pixels scrolled per wheel line.
    pub scroll_line: f64,
    pub initial_backdrop: Backdrop,
    pub title: String,
    pub show_window: bool,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            surface_size: (1280, 720),
            target_fps: None,
            gpu_power: GpuPowerPreference::default(),
            page_height: 4000.0,
            scroll_line: 40.0,
            initial_backdrop: Backdrop::default(),
            title: "Utsav".to_string(),
            show_window: true,
        }
    }
}
