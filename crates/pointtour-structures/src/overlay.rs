//! Photograph overlay shown when the viewer arrives at a marker.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Visibility of the photograph overlay.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum OverlayState {
    /// Nothing is shown.
    #[default]
    Hidden,
    /// The image is fading in since `started`.
    FadingIn {
        /// Image being shown.
        image: PathBuf,
        /// When the fade began.
        started: Instant,
    },
    /// The image is fully shown.
    Shown {
        /// Image being shown.
        image: PathBuf,
    },
}

/// Overlay displaying the photograph of the current marker.
#[derive(Debug, Clone)]
pub struct ImageOverlay {
    state: OverlayState,
    fade: Duration,
}

impl ImageOverlay {
    /// Creates a hidden overlay with the given fade-in duration.
    #[must_use]
    pub fn new(fade: Duration) -> Self {
        Self {
            state: OverlayState::Hidden,
            fade,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    /// Fade-in duration.
    #[must_use]
    pub fn fade(&self) -> Duration {
        self.fade
    }

    /// Starts showing `image`, replacing whatever was shown.
    pub fn show(&mut self, image: impl Into<PathBuf>, now: Instant) {
        let image = image.into();
        log::debug!("showing overlay image {}", image.display());
        self.state = if self.fade.is_zero() {
            OverlayState::Shown { image }
        } else {
            OverlayState::FadingIn {
                image,
                started: now,
            }
        };
    }

    /// Hides the overlay.
    pub fn hide(&mut self) {
        self.state = OverlayState::Hidden;
    }

    /// Whether an image is shown or fading in.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !matches!(self.state, OverlayState::Hidden)
    }

    /// The image shown, if any.
    #[must_use]
    pub fn image(&self) -> Option<&Path> {
        match &self.state {
            OverlayState::Hidden => None,
            OverlayState::FadingIn { image, .. } | OverlayState::Shown { image } => Some(image),
        }
    }

    /// Opacity in `[0, 1]` at `now`.
    #[must_use]
    pub fn opacity(&self, now: Instant) -> f32 {
        match &self.state {
            OverlayState::Hidden => 0.0,
            OverlayState::Shown { .. } => 1.0,
            OverlayState::FadingIn { started, .. } => {
                let elapsed = now.saturating_duration_since(*started);
                (elapsed.as_secs_f32() / self.fade.as_secs_f32()).clamp(0.0, 1.0)
            }
        }
    }

    /// Settles a finished fade into [`OverlayState::Shown`].
    pub fn update(&mut self, now: Instant) {
        if let OverlayState::FadingIn { image, started } = &self.state {
            if now.saturating_duration_since(*started) >= self.fade {
                self.state = OverlayState::Shown {
                    image: image.clone(),
                };
            }
        }
    }
}

impl Default for ImageOverlay {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_in_ramps_opacity() {
        let t0 = Instant::now();
        let mut overlay = ImageOverlay::new(Duration::from_millis(500));
        assert_eq!(overlay.opacity(t0), 0.0);
        assert!(overlay.image().is_none());

        overlay.show("a.jpg", t0);
        assert!(overlay.is_visible());
        assert_eq!(overlay.image(), Some(Path::new("a.jpg")));
        assert_eq!(overlay.opacity(t0), 0.0);
        assert!((overlay.opacity(t0 + Duration::from_millis(250)) - 0.5).abs() < 1e-4);
        assert_eq!(overlay.opacity(t0 + Duration::from_secs(2)), 1.0);

        overlay.update(t0 + Duration::from_millis(100));
        assert!(matches!(overlay.state(), OverlayState::FadingIn { .. }));
        overlay.update(t0 + Duration::from_millis(500));
        assert!(matches!(overlay.state(), OverlayState::Shown { .. }));
    }

    #[test]
    fn test_zero_fade_shows_immediately() {
        let t0 = Instant::now();
        let mut overlay = ImageOverlay::new(Duration::ZERO);
        overlay.show("b.png", t0);
        assert_eq!(overlay.opacity(t0), 1.0);
    }

    #[test]
    fn test_hide_and_replace() {
        let t0 = Instant::now();
        let mut overlay = ImageOverlay::default();
        overlay.show("a.jpg", t0);
        overlay.show("b.jpg", t0);
        assert_eq!(overlay.image(), Some(Path::new("b.jpg")));
        overlay.hide();
        assert!(!overlay.is_visible());
        assert_eq!(overlay.opacity(t0 + Duration::from_secs(1)), 0.0);
    }
}
