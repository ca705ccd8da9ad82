//! Full-desktop capture and cropping

use chrono::{DateTime, Local};
use image::RgbImage;

use super::backend::DisplayBackend;
use super::geometry::DesktopLayout;
use crate::domain::{CropBox, VirtualDesktop};
use crate::error::Result;

/// Whole virtual desktop as normalized RGB, grabbed in one pass
#[derive(Clone, Debug)]
pub struct CapturedFrame {
    pub desktop: VirtualDesktop,
    pub image: RgbImage,
    pub captured_at: DateTime<Local>,
}

impl CapturedFrame {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Extract the snip; the box is clamped to the frame first
    pub fn crop(&self, crop: CropBox) -> RgbImage {
        let left = crop.left.min(self.width());
        let top = crop.top.min(self.height());
        let width = crop.right.min(self.width()).saturating_sub(left);
        let height = crop.bottom.min(self.height()).saturating_sub(top);
        image::imageops::crop_imm(&self.image, left, top, width, height).to_image()
    }
}

/// Grab every monitor of `layout` and stitch them into one desktop-sized frame.
///
/// The backend is not asked for monitors again. Each monitor is placed at its
/// offset from the desktop origin. A grab whose pixel size differs from the
/// monitor's reported size is resampled to fit. Areas no monitor covers stay
/// black.
pub fn capture(backend: &dyn DisplayBackend, layout: &DesktopLayout) -> Result<CapturedFrame> {
    let DesktopLayout { desktop, monitors } = layout;
    let captured_at = Local::now();

    let mut grabs = Vec::with_capacity(monitors.len());
    for monitor in monitors {
        let rgb = backend.grab(monitor)?.into_rgb()?;
        grabs.push((monitor.rect(), rgb));
    }

    let mut image = RgbImage::new(desktop.width, desktop.height);
    for (rect, mut rgb) in grabs {
        let width = rect.width() as u32;
        let height = rect.height() as u32;
        if rgb.dimensions() != (width, height) {
            log::debug!(
                "Resampling {}x{} grab to {}x{}",
                rgb.width(),
                rgb.height(),
                width,
                height
            );
            rgb = image::imageops::resize(
                &rgb,
                width,
                height,
                image::imageops::FilterType::Lanczos3,
            );
        }
        let x = i64::from(rect.left) - i64::from(desktop.origin.x);
        let y = i64::from(rect.top) - i64::from(desktop.origin.y);
        image::imageops::overlay(&mut image, &rgb, x, y);
    }

    log::info!(
        "Captured {}x{} desktop from {} monitor(s)",
        image.width(),
        image.height(),
        monitors.len()
    );

    Ok(CapturedFrame {
        desktop: *desktop,
        image,
        captured_at,
    })
}
