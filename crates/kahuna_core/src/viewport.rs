//! Viewport proximity sensing for the scrollable result container.
//!
//! The host measures the container whenever it scrolls, resizes or its content
//! changes and hands the geometry to [`ViewportSensor::measure`]. The sensor
//! only keeps the latest signal so it can report changes.

/// Scroll container geometry in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub scroll_height: f64,
    pub client_height: f64,
    pub scroll_top: f64,
}

impl Geometry {
    pub fn new(scroll_height: f64, client_height: f64, scroll_top: f64) -> Self {
        Self {
            scroll_height,
            client_height,
            scroll_top,
        }
    }
}

/// Allowed distance in pixels between the viewport bottom and the content end
/// for the container to count as scrolled to the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BottomTolerance(f64);

impl BottomTolerance {
    /// Exact equality of `scroll_top + client_height` and `scroll_height`.
    pub const EXACT: Self = Self(0.0);

    /// Negative or non-finite values collapse to [`BottomTolerance::EXACT`].
    pub fn new(pixels: f64) -> Self {
        if pixels.is_finite() && pixels > 0.0 {
            Self(pixels)
        } else {
            Self::EXACT
        }
    }

    pub fn pixels(self) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportSignal {
    /// Content does not fill the viewport yet.
    pub has_slack_space: bool,
    /// The viewport bottom touches the end of the content.
    pub is_at_bottom: bool,
}

impl ViewportSignal {
    pub fn from_geometry(geometry: Geometry, tolerance: BottomTolerance) -> Self {
        let bottom = geometry.scroll_top + geometry.client_height;
        Self {
            has_slack_space: geometry.scroll_height <= geometry.client_height,
            is_at_bottom: (bottom - geometry.scroll_height).abs() <= tolerance.pixels(),
        }
    }

    /// Whether the stream should load older results.
    pub fn wants_more(self) -> bool {
        self.has_slack_space || self.is_at_bottom
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewportSensor {
    tolerance: BottomTolerance,
    last: Option<ViewportSignal>,
}

impl ViewportSensor {
    pub fn new(tolerance: BottomTolerance) -> Self {
        Self {
            tolerance,
            last: None,
        }
    }

    /// Recompute the signal from `geometry`; returns it only when it differs
    /// from the previously reported one.
    pub fn measure(&mut self, geometry: Geometry) -> Option<ViewportSignal> {
        let signal = ViewportSignal::from_geometry(geometry, self.tolerance);
        if self.last == Some(signal) {
            return None;
        }
        self.last = Some(signal);
        Some(signal)
    }

    /// Forget the last signal so the next measurement is always reported.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
