//! Host lifecycle notifications that drive the display mode

/// Notifications delivered by the platform to the watch face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleEvent {
    /// Face became visible or was covered/turned off
    VisibilityChanged(bool),
    /// Device entered or left the reduced-power ambient mode
    AmbientModeChanged(bool),
    /// Display capabilities reported by the platform
    PropertiesChanged {
        /// Panel uses fewer bits per color channel while ambient
        low_bit_ambient: bool,
    },
    /// System time zone changed
    TimeZoneChanged,
    /// Wall-clock time was set from an outside source
    ClockAdjusted,
    /// Once-per-minute tick delivered by the host while ambient
    TimeTick,
}

/// What the owner of the state machine must do after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reaction {
    /// Repaint the face now
    pub redraw: bool,
    /// Cancel the pending tick and reschedule per `should_animate()`
    pub reevaluate_timer: bool,
    /// Re-read the system time zone before the next repaint
    pub refresh_time_zone: bool,
}

impl Reaction {
    /// Nothing to do
    pub const NONE: Self = Self {
        redraw: false,
        reevaluate_timer: false,
        refresh_time_zone: false,
    };

    /// Repaint only
    pub const REDRAW: Self = Self {
        redraw: true,
        reevaluate_timer: false,
        refresh_time_zone: false,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaction_default_is_none() {
        assert_eq!(Reaction::default(), Reaction::NONE);
    }
}
