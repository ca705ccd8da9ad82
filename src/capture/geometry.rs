//! Virtual desktop resolution across all monitors

use super::backend::{DisplayBackend, MonitorInfo};
use crate::domain::VirtualDesktop;
use crate::error::{Result, SnipError};

/// Monitors enumerated once for a capture session and the desktop they span
#[derive(Clone, Debug)]
pub struct DesktopLayout {
    pub desktop: VirtualDesktop,
    /// Monitors with a non-zero size, in backend order
    pub monitors: Vec<MonitorInfo>,
}

/// Union of every monitor the backend reports, including ones placed left of
/// or above the primary. Queried fresh for each capture session; the capture
/// that follows reuses this monitor list.
pub fn resolve(backend: &dyn DisplayBackend) -> Result<DesktopLayout> {
    let monitors: Vec<MonitorInfo> = backend
        .monitors()?
        .into_iter()
        .filter(|m| m.width > 0 && m.height > 0)
        .collect();
    let desktop = VirtualDesktop::from_monitor_rects(monitors.iter().map(|m| m.rect()))
        .ok_or_else(|| SnipError::DisplayUnavailable("no monitors enumerated".to_string()))?;

    for m in &monitors {
        log::debug!(
            "Monitor {}{}: {}x{} at ({}, {}), scale {}",
            m.name,
            if m.primary { " (primary)" } else { "" },
            m.width,
            m.height,
            m.x,
            m.y,
            m.scale_factor
        );
    }
    log::debug!(
        "Virtual desktop: origin ({}, {}), {}x{} across {} monitor(s)",
        desktop.origin.x,
        desktop.origin.y,
        desktop.width,
        desktop.height,
        monitors.len()
    );
    Ok(DesktopLayout { desktop, monitors })
}
