//! Overlay on/off state and its slider mapping.
//!
//! The slider has exactly two notches. Position 0 is off and position 1 is
//! on; the same integer is what the backend receives.

use crate::error::InvalidSliderValue;
use std::fmt;

/// Label shown above the slider.
pub const SLIDER_LABEL: &str = "Performance Overlay Level";

/// Whether the on-screen display is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OverlayState {
    /// The overlay is hidden.
    #[default]
    Off = 0,
    /// The overlay is shown.
    On = 1,
}

impl OverlayState {
    /// Every state in slider order.
    pub const ALL: [Self; 2] = [Self::Off, Self::On];

    /// Build a state from a slider position.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSliderValue`] for anything other than 0 or 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtss_overlay::OverlayState;
    ///
    /// assert_eq!(OverlayState::from_slider(1), Ok(OverlayState::On));
    /// assert!(OverlayState::from_slider(2).is_err());
    /// ```
    pub fn from_slider(value: i64) -> Result<Self, InvalidSliderValue> {
        match value {
            0 => Ok(Self::Off),
            1 => Ok(Self::On),
            _ => Err(InvalidSliderValue { value }),
        }
    }

    /// Slider position, also the value sent to the backend.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Notch label, `OFF` or `ON`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }

    /// Notch labels in slider order.
    #[must_use]
    pub fn notch_labels() -> [(u8, &'static str); 2] {
        Self::ALL.map(|state| (state.value(), state.label()))
    }
}

impl TryFrom<i64> for OverlayState {
    type Error = InvalidSliderValue;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_slider(value)
    }
}

impl fmt::Display for OverlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, OverlayState::Off, "OFF")]
    #[case(1, OverlayState::On, "ON")]
    fn slider_positions_map_to_states(
        #[case] value: i64,
        #[case] expected: OverlayState,
        #[case] label: &str,
    ) {
        let state = OverlayState::from_slider(value).expect("valid position");
        assert_eq!(state, expected);
        assert_eq!(state.label(), label);
        assert_eq!(i64::from(state.value()), value);
    }

    #[rstest]
    #[case::negative(-1)]
    #[case::past_last_notch(2)]
    #[case::far_out(i64::MAX)]
    fn out_of_range_positions_are_rejected(#[case] value: i64) {
        assert_eq!(
            OverlayState::try_from(value),
            Err(InvalidSliderValue { value })
        );
    }

    #[test]
    fn default_state_is_off() {
        assert_eq!(OverlayState::default(), OverlayState::Off);
    }

    #[test]
    fn notch_labels_follow_slider_order() {
        assert_eq!(OverlayState::notch_labels(), [(0, "OFF"), (1, "ON")]);
    }
}
