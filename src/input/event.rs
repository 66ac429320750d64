//! Raw device events as delivered by the host platform.
use std::str::FromStr;

use glam::Vec2;

/// Physical key, identified the way DOM `KeyboardEvent.code` names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// `KeyW`.
    W,
    /// `KeyA`.
    A,
    /// `KeyS`.
    S,
    /// `KeyD`.
    D,
    /// `KeyR`.
    R,
    /// `ArrowUp`.
    ArrowUp,
    /// `ArrowDown`.
    ArrowDown,
    /// `ArrowLeft`.
    ArrowLeft,
    /// `ArrowRight`.
    ArrowRight,
    /// `Space`.
    Space,
    /// `ShiftLeft`.
    ShiftLeft,
    /// `ShiftRight`.
    ShiftRight,
    /// `F1`.
    F1,
    /// Any other key. Tracked as held like the rest but bound to nothing.
    Unidentified,
}

impl KeyCode {
    /// Maps a DOM `code` string, treating unknown codes as
    /// [`KeyCode::Unidentified`].
    ///
    /// # Examples
    /// ```
    /// use wayfarer::input::KeyCode;
    /// assert_eq!(KeyCode::from_code("KeyW"), KeyCode::W);
    /// assert_eq!(KeyCode::from_code("Numpad7"), KeyCode::Unidentified);
    /// ```
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "KeyW" => Self::W,
            "KeyA" => Self::A,
            "KeyS" => Self::S,
            "KeyD" => Self::D,
            "KeyR" => Self::R,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Space" => Self::Space,
            "ShiftLeft" => Self::ShiftLeft,
            "ShiftRight" => Self::ShiftRight,
            "F1" => Self::F1,
            _ => Self::Unidentified,
        }
    }
}

impl FromStr for KeyCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_code(s))
    }
}

/// Pointer button index as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Button 0; drags rotate the camera.
    Primary,
    /// Button 2.
    Secondary,
    /// Any other button.
    Other(u8),
}

impl From<u8> for PointerButton {
    fn from(index: u8) -> Self {
        match index {
            0 => Self::Primary,
            2 => Self::Secondary,
            other => Self::Other(other),
        }
    }
}

/// One device event fed to [`InputAggregator::handle`](super::InputAggregator::handle).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInputEvent {
    /// Key pressed; repeats are harmless.
    KeyDown(KeyCode),
    /// Key released.
    KeyUp(KeyCode),
    /// Pointer button pressed over the surface.
    PointerDown(PointerButton),
    /// Pointer button released over the surface.
    PointerUp(PointerButton),
    /// Pointer moved over the surface.
    PointerMove {
        /// Pointer position in client pixels.
        client: Vec2,
        /// Raw motion since the previous move event, in pixels.
        movement: Vec2,
    },
    /// Completed click of a button.
    Click(PointerButton),
    /// Context-menu request, i.e. a right click.
    ContextMenu,
    /// Wheel scroll; positive `delta_y` scrolls down.
    Wheel {
        /// Raw vertical wheel delta.
        delta_y: f32,
    },
}

impl RawInputEvent {
    /// Convenience constructor for a key press from its DOM code.
    #[must_use]
    pub fn key_down(code: &str) -> Self {
        Self::KeyDown(KeyCode::from_code(code))
    }

    /// Convenience constructor for a key release from its DOM code.
    #[must_use]
    pub fn key_up(code: &str) -> Self {
        Self::KeyUp(KeyCode::from_code(code))
    }
}

/// Client-space rectangle of the render surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    /// Left edge in client pixels.
    pub left: f32,
    /// Top edge in client pixels.
    pub top: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl SurfaceRect {
    /// Surface anchored at the client origin.
    #[must_use]
    pub const fn sized(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    /// Width over height, or `None` for an empty surface.
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f32> {
        (self.width > 0.0 && self.height > 0.0).then(|| self.width / self.height)
    }

    /// Maps a client position to normalised device coordinates.
    ///
    /// X grows rightwards and Y upwards, both in `[-1, 1]` across the
    /// surface. Returns `None` for an empty surface.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec2;
    /// use wayfarer::input::SurfaceRect;
    /// let rect = SurfaceRect::sized(800.0, 600.0);
    /// assert_eq!(rect.normalise(Vec2::new(400.0, 300.0)), Some(Vec2::ZERO));
    /// assert_eq!(rect.normalise(Vec2::ZERO), Some(Vec2::new(-1.0, 1.0)));
    /// ```
    #[must_use]
    pub fn normalise(&self, client: Vec2) -> Option<Vec2> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            ((client.x - self.left) / self.width).mul_add(2.0, -1.0),
            ((client.y - self.top) / self.height).mul_add(-2.0, 1.0),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("KeyW", KeyCode::W)]
    #[case("ArrowLeft", KeyCode::ArrowLeft)]
    #[case("ShiftRight", KeyCode::ShiftRight)]
    #[case("F1", KeyCode::F1)]
    #[case("keyw", KeyCode::Unidentified)]
    fn parses_dom_codes(#[case] code: &str, #[case] expected: KeyCode) {
        assert_eq!(KeyCode::from_code(code), expected);
    }

    #[rstest]
    #[case(0, PointerButton::Primary)]
    #[case(2, PointerButton::Secondary)]
    #[case(1, PointerButton::Other(1))]
    fn maps_button_indices(#[case] index: u8, #[case] expected: PointerButton) {
        assert_eq!(PointerButton::from(index), expected);
    }

    #[test]
    fn empty_surface_does_not_normalise() {
        assert_eq!(SurfaceRect::sized(0.0, 600.0).normalise(Vec2::ONE), None);
        assert_eq!(SurfaceRect::sized(800.0, 0.0).aspect_ratio(), None);
    }

    #[test]
    fn offset_surface_normalises_relative_to_its_corner() {
        let rect = SurfaceRect {
            left: 100.0,
            top: 50.0,
            width: 200.0,
            height: 100.0,
        };
        assert_eq!(
            rect.normalise(Vec2::new(300.0, 150.0)),
            Some(Vec2::new(1.0, -1.0))
        );
    }
}
