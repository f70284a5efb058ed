//! Configuration surface.
//!
//! [`InteractionConfig`] carries every recognized option with its documented
//! default. Field names serialize to the camelCase option names
//! (`tapDurationInMs`, `itemPositionLimitBySize`, ...) so a host can load them
//! with any serde format. The crate never reads configuration files itself.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// ACTIVATION METHODS
// =============================================================================

/// How a mouse activates the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MouseActivation {
    /// Press and release without moving further than `click_move_limit`.
    #[default]
    Click,
    /// Native double-click.
    DoubleClick,
    /// Pointer over the region.
    Hover,
    /// Press-and-hold.
    MouseDown,
}

impl MouseActivation {
    pub const ALL: [Self; 4] = [Self::Click, Self::DoubleClick, Self::Hover, Self::MouseDown];

    /// The option name as it appears in configuration.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::DoubleClick => "doubleClick",
            Self::Hover => "hover",
            Self::MouseDown => "mouseDown",
        }
    }
}

impl fmt::Display for MouseActivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MouseActivation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.name() == s)
            .ok_or_else(|| ConfigError::UnknownMouseActivation(s.to_string()))
    }
}

/// How a touch activates the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TouchActivation {
    /// Touch and release within `tap_duration_in_ms`.
    #[default]
    Tap,
    /// Two taps within `double_tap_duration_in_ms`.
    DoubleTap,
    /// Active for as long as the finger is down.
    Touch,
    /// Hold still for `long_touch_duration_in_ms`.
    LongTouch,
}

impl TouchActivation {
    pub const ALL: [Self; 4] = [Self::Tap, Self::DoubleTap, Self::Touch, Self::LongTouch];

    /// The option name as it appears in configuration.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tap => "tap",
            Self::DoubleTap => "doubleTap",
            Self::Touch => "touch",
            Self::LongTouch => "longTouch",
        }
    }
}

impl fmt::Display for TouchActivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TouchActivation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.name() == s)
            .ok_or_else(|| ConfigError::UnknownTouchActivation(s.to_string()))
    }
}

// =============================================================================
// DEFAULTS
// =============================================================================

pub const DEFAULT_TAP_DURATION_MS: u64 = 180;
pub const DEFAULT_DOUBLE_TAP_DURATION_MS: u64 = 400;
pub const DEFAULT_LONG_TOUCH_DURATION_MS: u64 = 500;
pub const DEFAULT_LONG_TOUCH_MOVE_LIMIT: f64 = 5.0;
pub const DEFAULT_CLICK_MOVE_LIMIT: f64 = 5.0;
pub const DEFAULT_MIN_UPDATE_SPEED_MS: u64 = 1;
pub const DEFAULT_ITEM_MOVEMENT_MULTIPLIER: f64 = 1.0;

// =============================================================================
// INTERACTION CONFIG
// =============================================================================

/// All recognized options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionConfig {
    pub mouse_activation_method: MouseActivation,
    pub touch_activation_method: TouchActivation,

    pub tap_duration_in_ms: u64,
    pub double_tap_duration_in_ms: u64,
    pub long_touch_duration_in_ms: u64,
    pub long_touch_move_limit: f64,
    pub click_move_limit: f64,
    /// Keep a press-and-hold going while the pointer is outside the region.
    pub mouse_down_allow_outside: bool,

    pub item_position_min_x: Option<f64>,
    /// Negative values are measured from the container's right edge.
    pub item_position_max_x: Option<f64>,
    pub item_position_min_y: Option<f64>,
    /// Negative values are measured from the container's bottom edge.
    pub item_position_max_y: Option<f64>,
    pub item_position_limit_by_size: bool,
    pub item_position_limit_internal: bool,

    pub link_item_to_active: bool,
    pub align_item_on_active_pos: bool,
    pub center_item_on_activate: bool,
    pub center_item_on_activate_pos: bool,
    pub center_item_on_load: bool,
    pub item_movement_multiplier: f64,

    pub track_passive_position: bool,
    pub track_item_position: bool,
    pub track_previous_position: bool,

    /// Minimum time between accepted position updates. 0 disables throttling.
    pub min_update_speed_in_ms: u64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            mouse_activation_method: MouseActivation::default(),
            touch_activation_method: TouchActivation::default(),
            tap_duration_in_ms: DEFAULT_TAP_DURATION_MS,
            double_tap_duration_in_ms: DEFAULT_DOUBLE_TAP_DURATION_MS,
            long_touch_duration_in_ms: DEFAULT_LONG_TOUCH_DURATION_MS,
            long_touch_move_limit: DEFAULT_LONG_TOUCH_MOVE_LIMIT,
            click_move_limit: DEFAULT_CLICK_MOVE_LIMIT,
            mouse_down_allow_outside: false,
            item_position_min_x: None,
            item_position_max_x: None,
            item_position_min_y: None,
            item_position_max_y: None,
            item_position_limit_by_size: false,
            item_position_limit_internal: false,
            link_item_to_active: false,
            align_item_on_active_pos: false,
            center_item_on_activate: false,
            center_item_on_activate_pos: false,
            center_item_on_load: false,
            item_movement_multiplier: DEFAULT_ITEM_MOVEMENT_MULTIPLIER,
            track_passive_position: false,
            track_item_position: false,
            track_previous_position: false,
            min_update_speed_in_ms: DEFAULT_MIN_UPDATE_SPEED_MS,
        }
    }
}

impl InteractionConfig {
    pub fn tap_duration(&self) -> Duration {
        Duration::from_millis(self.tap_duration_in_ms)
    }

    pub fn double_tap_duration(&self) -> Duration {
        Duration::from_millis(self.double_tap_duration_in_ms)
    }

    pub fn long_touch_duration(&self) -> Duration {
        Duration::from_millis(self.long_touch_duration_in_ms)
    }

    /// Throttle interval, `None` when throttling is disabled.
    pub fn min_update_interval(&self) -> Option<Duration> {
        (self.min_update_speed_in_ms > 0).then(|| Duration::from_millis(self.min_update_speed_in_ms))
    }

    /// Whether `prev_active_position` is maintained.
    pub fn tracks_previous(&self) -> bool {
        self.track_previous_position || self.track_item_position
    }

    /// Check the numeric options.
    ///
    /// The controller does not require this; a configuration that fails here
    /// still runs and simply produces numeric anomalies.
    pub fn validate(&self) -> ConfigResult<()> {
        non_negative("long_touch_move_limit", self.long_touch_move_limit)?;
        non_negative("click_move_limit", self.click_move_limit)?;
        finite("item_movement_multiplier", self.item_movement_multiplier)?;

        let bounds = [
            ("item_position_min_x", self.item_position_min_x),
            ("item_position_max_x", self.item_position_max_x),
            ("item_position_min_y", self.item_position_min_y),
            ("item_position_max_y", self.item_position_max_y),
        ];
        for (field, value) in bounds {
            if let Some(value) = value {
                finite(field, value)?;
            }
        }

        ordered('x', self.item_position_min_x, self.item_position_max_x)?;
        ordered('y', self.item_position_min_y, self.item_position_max_y)?;
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFiniteValue { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> ConfigResult<()> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::NegativeValue { field, value });
    }
    Ok(())
}

// A negative max is relative to the far edge, so it can only be compared
// once geometry is known.
fn ordered(axis: char, min: Option<f64>, max: Option<f64>) -> ConfigResult<()> {
    match (min, max) {
        (Some(min), Some(max)) if max >= 0.0 && min > max => {
            Err(ConfigError::InvertedLimits { axis, min, max })
        }
        _ => Ok(()),
    }
}
