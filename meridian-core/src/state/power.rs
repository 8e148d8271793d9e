//! Button and idle policy for boards without a host compositor
//!
//! Turns button gestures and idle timeouts into the lifecycle notifications
//! a host would otherwise deliver. The caller measures a press only after
//! its falling edge has won the race against the timer, so a press that is
//! still held when the timer would have expired is never cut short.

use heapless::Vec;

use super::events::LifecycleEvent;

/// What woke the power task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerInput {
    ShortPress,
    LongPress,
    /// The wait returned by `PowerPolicy::wait` ran out
    Timeout,
}

/// What to race the button against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerWait {
    /// Hidden: only a press matters
    ButtonOnly,
    /// Active: drop to ambient after the idle timeout
    Idle,
    /// Ambient: deliver the minute tick
    AmbientTick,
}

/// Lifecycle notifications produced by one input
pub type PowerEvents = Vec<LifecycleEvent, 2>;

/// Visibility and ambient flags as driven by the button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerPolicy {
    visible: bool,
    ambient: bool,
}

impl Default for PowerPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerPolicy {
    /// Visible and interactive, as after boot
    pub const fn new() -> Self {
        Self {
            visible: true,
            ambient: false,
        }
    }

    /// Notifications that announce the boot state
    pub fn startup(&self, low_bit_ambient: bool) -> PowerEvents {
        let mut events = Vec::new();
        let _ = events.push(LifecycleEvent::PropertiesChanged { low_bit_ambient });
        let _ = events.push(LifecycleEvent::VisibilityChanged(self.visible));
        events
    }

    pub fn wait(&self) -> PowerWait {
        match (self.visible, self.ambient) {
            (false, _) => PowerWait::ButtonOnly,
            (true, false) => PowerWait::Idle,
            (true, true) => PowerWait::AmbientTick,
        }
    }

    /// Apply one input
    pub fn on_input(&mut self, input: PowerInput) -> PowerEvents {
        let mut events = Vec::new();

        // At most two events per input, so pushes never fail
        match (self.visible, input) {
            (false, PowerInput::Timeout) => {}
            (false, _) => {
                self.visible = true;
                self.ambient = false;
                let _ = events.push(LifecycleEvent::AmbientModeChanged(false));
                let _ = events.push(LifecycleEvent::VisibilityChanged(true));
            }
            (true, PowerInput::LongPress) => {
                self.visible = false;
                let _ = events.push(LifecycleEvent::VisibilityChanged(false));
            }
            (true, PowerInput::ShortPress) => {
                if self.ambient {
                    self.ambient = false;
                    let _ = events.push(LifecycleEvent::AmbientModeChanged(false));
                }
            }
            (true, PowerInput::Timeout) => {
                if self.ambient {
                    let _ = events.push(LifecycleEvent::TimeTick);
                } else {
                    self.ambient = true;
                    let _ = events.push(LifecycleEvent::AmbientModeChanged(true));
                }
            }
        }

        events
    }
}
