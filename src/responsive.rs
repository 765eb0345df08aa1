//! Width to breakpoint classification

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Widths below this are classified as mobile
pub const TABLET_MIN_WIDTH: u32 = 480;
/// Widths at or above this are classified as desktop
pub const DESKTOP_MIN_WIDTH: u32 = 768;

/// Discrete responsive class
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    /// Canonical container width used when previewing a device class
    pub fn preview_width(self) -> u32 {
        match self {
            Breakpoint::Mobile => 375,
            Breakpoint::Tablet => 768,
            Breakpoint::Desktop => 1280,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// What the classifier sees: a measured width or an explicit device preview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewport {
    /// Measured container width in pixels; zero means not measured yet
    Measured(u32),
    /// Device-preview toggle chosen by the user
    Override(Breakpoint),
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::Measured(0)
    }
}

/// Classify a viewport; an explicit override always wins
pub fn classify(viewport: Viewport) -> Breakpoint {
    match viewport {
        Viewport::Override(breakpoint) => breakpoint,
        Viewport::Measured(width) => classify_width(width),
    }
}

/// Classify a measured width; zero (unmeasured) is desktop
pub fn classify_width(width: u32) -> Breakpoint {
    match width {
        0 => Breakpoint::Desktop,
        w if w < TABLET_MIN_WIDTH => Breakpoint::Mobile,
        w if w < DESKTOP_MIN_WIDTH => Breakpoint::Tablet,
        _ => Breakpoint::Desktop,
    }
}

/// A container-size notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeEvent {
    /// Monotonic measurement number assigned by the host
    pub sequence: u64,
    pub width: u32,
}

impl ResizeEvent {
    pub fn new(sequence: u64, width: u32) -> Self {
        Self { sequence, width }
    }
}

/// Tracks the latest container width and the device-preview override
///
/// The breakpoint is recomputed on every query rather than stored.
#[derive(Debug, Clone, Default)]
pub struct ResponsiveTracker {
    width: u32,
    last_sequence: Option<u64>,
    device_override: Option<Breakpoint>,
}

impl ResponsiveTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an initial viewport
    pub fn from_viewport(viewport: Viewport) -> Self {
        match viewport {
            Viewport::Measured(width) => Self {
                width,
                ..Self::default()
            },
            Viewport::Override(breakpoint) => Self {
                device_override: Some(breakpoint),
                ..Self::default()
            },
        }
    }

    /// Apply a resize event unless a newer one was already applied
    ///
    /// Returns whether the event was applied.
    pub fn observe(&mut self, event: ResizeEvent) -> bool {
        if self.last_sequence.is_some_and(|last| event.sequence < last) {
            tracing::debug!(
                sequence = event.sequence,
                width = event.width,
                "stale resize event ignored"
            );
            return false;
        }
        self.last_sequence = Some(event.sequence);
        self.width = event.width;
        true
    }

    /// Set or clear the device-preview override
    pub fn set_override(&mut self, breakpoint: Option<Breakpoint>) {
        self.device_override = breakpoint;
    }

    pub fn device_override(&self) -> Option<Breakpoint> {
        self.device_override
    }

    /// Last measured width
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn viewport(&self) -> Viewport {
        match self.device_override {
            Some(breakpoint) => Viewport::Override(breakpoint),
            None => Viewport::Measured(self.width),
        }
    }

    pub fn breakpoint(&self) -> Breakpoint {
        classify(self.viewport())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(classify_width(479), Breakpoint::Mobile);
        assert_eq!(classify_width(480), Breakpoint::Tablet);
        assert_eq!(classify_width(767), Breakpoint::Tablet);
        assert_eq!(classify_width(768), Breakpoint::Desktop);
        assert_eq!(classify_width(1), Breakpoint::Mobile);
    }

    #[test]
    fn test_unmeasured_width_is_desktop() {
        assert_eq!(classify_width(0), Breakpoint::Desktop);
        assert_eq!(classify(Viewport::default()), Breakpoint::Desktop);
    }

    #[test]
    fn test_override_wins_over_width() {
        assert_eq!(
            classify(Viewport::Override(Breakpoint::Mobile)),
            Breakpoint::Mobile
        );

        let mut tracker = ResponsiveTracker::new();
        tracker.observe(ResizeEvent::new(1, 1440));
        tracker.set_override(Some(Breakpoint::Tablet));
        assert_eq!(tracker.breakpoint(), Breakpoint::Tablet);
        tracker.set_override(None);
        assert_eq!(tracker.breakpoint(), Breakpoint::Desktop);
    }

    #[test]
    fn test_last_measured_width_wins() {
        let mut tracker = ResponsiveTracker::new();
        assert!(tracker.observe(ResizeEvent::new(2, 400)));
        assert!(!tracker.observe(ResizeEvent::new(1, 1200)));
        assert_eq!(tracker.width(), 400);
        assert_eq!(tracker.breakpoint(), Breakpoint::Mobile);

        assert!(tracker.observe(ResizeEvent::new(3, 600)));
        assert_eq!(tracker.breakpoint(), Breakpoint::Tablet);
    }

    #[test]
    fn test_breakpoint_follows_every_change() {
        let mut tracker = ResponsiveTracker::new();
        for (seq, (width, expected)) in [
            (320, Breakpoint::Mobile),
            (900, Breakpoint::Desktop),
            (500, Breakpoint::Tablet),
        ]
        .into_iter()
        .enumerate()
        {
            tracker.observe(ResizeEvent::new(seq as u64, width));
            assert_eq!(tracker.breakpoint(), expected);
        }
    }

    #[test]
    fn test_preview_widths_classify_to_themselves() {
        for breakpoint in [Breakpoint::Mobile, Breakpoint::Tablet, Breakpoint::Desktop] {
            assert_eq!(classify_width(breakpoint.preview_width()), breakpoint);
        }
    }
}
