//! Display backends: monitor enumeration and raw pixel grabs
//!
//! This is the layer that talks to the OS. Everything above it works on
//! [`MonitorInfo`] and [`RawFrame`] so it can be exercised with a
//! synthetic desktop in tests.

use std::cell::RefCell;

use image::RgbImage;

use crate::domain::Rect;
use crate::error::{Result, SnipError};

/// One physical display as reported by the backend
#[derive(Clone, Debug, PartialEq)]
pub struct MonitorInfo {
    pub id: u32,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub scale_factor: f32,
    pub primary: bool,
}

impl MonitorInfo {
    /// Monitor extent in absolute screen coordinates
    pub fn rect(&self) -> Rect {
        Rect {
            left: self.x,
            top: self.y,
            right: self.x.saturating_add(self.width as i32),
            bottom: self.y.saturating_add(self.height as i32),
        }
    }
}

/// Channel order of a backend buffer. Rows are tightly packed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    Rgb,
    Rgba,
    Bgr,
    Bgra,
}

impl PixelLayout {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelLayout::Rgb | PixelLayout::Bgr => 3,
            PixelLayout::Rgba | PixelLayout::Bgra => 4,
        }
    }
}

/// Pixels exactly as the backend produced them
#[derive(Clone, Debug)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    pub data: Vec<u8>,
}

impl RawFrame {
    /// Normalize to packed RGB, dropping alpha and swapping BGR orders
    pub fn into_rgb(self) -> Result<RgbImage> {
        let bpp = self.layout.bytes_per_pixel();
        let expected = self.width as usize * self.height as usize * bpp;
        if self.data.len() < expected {
            return Err(SnipError::CaptureDenied(format!(
                "short frame: {} bytes for {}x{} {:?}",
                self.data.len(),
                self.width,
                self.height,
                self.layout
            )));
        }

        let rgb = match self.layout {
            PixelLayout::Rgb => {
                let mut data = self.data;
                data.truncate(expected);
                data
            }
            layout => {
                let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 3);
                for px in self.data[..expected].chunks_exact(bpp) {
                    match layout {
                        PixelLayout::Rgba => out.extend_from_slice(&px[..3]),
                        PixelLayout::Bgr | PixelLayout::Bgra => {
                            out.extend_from_slice(&[px[2], px[1], px[0]])
                        }
                        PixelLayout::Rgb => unreachable!(),
                    }
                }
                out
            }
        };

        RgbImage::from_raw(self.width, self.height, rgb).ok_or_else(|| {
            SnipError::CaptureDenied("frame buffer does not match its size".to_string())
        })
    }
}

/// Source of monitors and their pixels
pub trait DisplayBackend {
    /// Every connected monitor, in backend order
    fn monitors(&self) -> Result<Vec<MonitorInfo>>;

    /// Grab one monitor's current contents
    fn grab(&self, monitor: &MonitorInfo) -> Result<RawFrame>;
}

/// Real desktop via the `xcap` crate.
///
/// `grab` reuses the handles from the last `monitors()` call, so a capture
/// session never sees a different monitor set than the one it resolved.
#[derive(Default)]
pub struct XcapBackend {
    handles: RefCell<Vec<xcap::Monitor>>,
}

impl DisplayBackend for XcapBackend {
    fn monitors(&self) -> Result<Vec<MonitorInfo>> {
        let monitors =
            xcap::Monitor::all().map_err(|e| SnipError::DisplayUnavailable(e.to_string()))?;

        let infos = monitors
            .iter()
            .map(|m| {
                let info = || -> std::result::Result<MonitorInfo, xcap::XCapError> {
                    Ok(MonitorInfo {
                        id: m.id()?,
                        name: m.name().unwrap_or_default(),
                        x: m.x()?,
                        y: m.y()?,
                        width: m.width()?,
                        height: m.height()?,
                        scale_factor: m.scale_factor().unwrap_or(1.0),
                        primary: m.is_primary().unwrap_or(false),
                    })
                };
                info().map_err(|e| SnipError::DisplayUnavailable(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        *self.handles.borrow_mut() = monitors;
        Ok(infos)
    }

    fn grab(&self, monitor: &MonitorInfo) -> Result<RawFrame> {
        let handles = self.handles.borrow();
        let handle = handles
            .iter()
            .find(|m| m.id().ok() == Some(monitor.id))
            .ok_or_else(|| {
                SnipError::DisplayUnavailable(format!("monitor {} was not enumerated", monitor.name))
            })?;

        let image = handle
            .capture_image()
            .map_err(|e| SnipError::CaptureDenied(e.to_string()))?;
        log::debug!(
            "Grabbed monitor {} ({}x{} pixels)",
            monitor.name,
            image.width(),
            image.height()
        );

        Ok(RawFrame {
            width: image.width(),
            height: image.height(),
            layout: PixelLayout::Rgba,
            data: image.into_raw(),
        })
    }
}

/// In-memory desktop for tests: solid or gradient monitors with a chosen layout
#[cfg(test)]
pub mod synthetic {
    use super::*;

    pub struct SyntheticBackend {
        pub monitors: Vec<MonitorInfo>,
        pub layout: PixelLayout,
        pub deny_capture: bool,
        /// Reported instead of `monitors` from the second query on
        pub replugged: Option<Vec<MonitorInfo>>,
        pub monitor_queries: std::cell::Cell<usize>,
    }

    impl SyntheticBackend {
        /// Monitors given as (x, y, width, height)
        pub fn new(rects: &[(i32, i32, u32, u32)]) -> Self {
            let monitors = rects
                .iter()
                .enumerate()
                .map(|(i, &(x, y, width, height))| MonitorInfo {
                    id: i as u32,
                    name: format!("SYN-{i}"),
                    x,
                    y,
                    width,
                    height,
                    scale_factor: 1.0,
                    primary: i == 0,
                })
                .collect();
            Self {
                monitors,
                layout: PixelLayout::Bgra,
                deny_capture: false,
                replugged: None,
                monitor_queries: std::cell::Cell::new(0),
            }
        }

        /// RGB value the synthetic desktop shows at an absolute screen position
        pub fn pixel_at(x: i32, y: i32) -> [u8; 3] {
            [
                (x.rem_euclid(256)) as u8,
                (y.rem_euclid(256)) as u8,
                ((x + y).rem_euclid(7) * 30) as u8,
            ]
        }
    }

    impl DisplayBackend for SyntheticBackend {
        fn monitors(&self) -> Result<Vec<MonitorInfo>> {
            let queries = self.monitor_queries.get();
            self.monitor_queries.set(queries + 1);
            match &self.replugged {
                Some(replugged) if queries > 0 => Ok(replugged.clone()),
                _ => Ok(self.monitors.clone()),
            }
        }

        fn grab(&self, monitor: &MonitorInfo) -> Result<RawFrame> {
            if self.deny_capture {
                return Err(SnipError::CaptureDenied("synthetic refusal".to_string()));
            }
            let bpp = self.layout.bytes_per_pixel();
            let mut data = Vec::with_capacity((monitor.width * monitor.height) as usize * bpp);
            for y in 0..monitor.height as i32 {
                for x in 0..monitor.width as i32 {
                    let [r, g, b] = Self::pixel_at(monitor.x + x, monitor.y + y);
                    match self.layout {
                        PixelLayout::Rgb => data.extend_from_slice(&[r, g, b]),
                        PixelLayout::Rgba => data.extend_from_slice(&[r, g, b, 255]),
                        PixelLayout::Bgr => data.extend_from_slice(&[b, g, r]),
                        PixelLayout::Bgra => data.extend_from_slice(&[b, g, r, 255]),
                    }
                }
            }
            Ok(RawFrame {
                width: monitor.width,
                height: monitor.height,
                layout: self.layout,
                data,
            })
        }
    }
}
