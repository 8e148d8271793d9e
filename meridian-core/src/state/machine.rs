//! Display mode state machine
//!
//! Everything the frame timer and the renderer need to know about the
//! panel is a function of three flags. Transitions are driven only by
//! lifecycle notifications.

use super::events::{LifecycleEvent, Reaction};

/// Derived display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    /// Visible, full power, per-second redraw
    Active,
    /// Visible, reduced power, redraw cadence suspended
    Ambient,
    /// Not visible
    Hidden,
}

/// Panel flags as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayState {
    pub visible: bool,
    pub ambient: bool,
    pub low_bit_ambient: bool,
}

impl DisplayState {
    /// Hidden, interactive, full color depth
    pub const fn new() -> Self {
        Self {
            visible: false,
            ambient: false,
            low_bit_ambient: false,
        }
    }

    /// Current mode derived from the flags
    pub fn mode(&self) -> DisplayMode {
        match (self.visible, self.ambient) {
            (false, _) => DisplayMode::Hidden,
            (true, true) => DisplayMode::Ambient,
            (true, false) => DisplayMode::Active,
        }
    }

    /// Periodic redraw runs iff visible and interactive
    pub fn should_animate(&self) -> bool {
        self.visible && !self.ambient
    }

    /// Low-bit panels lose anti-aliasing while ambient
    pub fn anti_alias(&self) -> bool {
        !(self.ambient && self.low_bit_ambient)
    }
}

/// Owner of `DisplayState`
#[derive(Debug, Clone, Default)]
pub struct ModeStateMachine {
    state: DisplayState,
    /// Time-zone notifications are only honoured while visible
    zone_listening: bool,
}

impl ModeStateMachine {
    /// Create a machine in the hidden state
    pub const fn new() -> Self {
        Self {
            state: DisplayState::new(),
            zone_listening: false,
        }
    }

    /// Snapshot of the current flags
    pub fn state(&self) -> DisplayState {
        self.state
    }

    pub fn mode(&self) -> DisplayMode {
        self.state.mode()
    }

    /// The single predicate the frame timer consults
    pub fn should_animate(&self) -> bool {
        self.state.should_animate()
    }

    /// Whether time-zone change notifications are currently registered
    pub fn is_listening_for_zone(&self) -> bool {
        self.zone_listening
    }

    /// Visibility changed
    ///
    /// Becoming visible re-reads the zone (it may have changed while
    /// hidden) and repaints. Either way the timer is re-evaluated.
    pub fn set_visible(&mut self, visible: bool) -> Reaction {
        self.state.visible = visible;
        self.zone_listening = visible;

        Reaction {
            redraw: visible,
            reevaluate_timer: true,
            refresh_time_zone: visible,
        }
    }

    /// Ambient mode changed
    ///
    /// The flag is stored even while hidden so the next `set_visible(true)`
    /// lands in the right mode. A repaint is forced only when the flag
    /// actually flipped on a visible panel.
    pub fn set_ambient(&mut self, ambient: bool) -> Reaction {
        let changed = self.state.ambient != ambient;
        self.state.ambient = ambient;

        Reaction {
            redraw: changed && self.state.visible,
            reevaluate_timer: true,
            refresh_time_zone: false,
        }
    }

    /// Capability report from the platform
    pub fn set_low_bit_ambient(&mut self, low_bit_ambient: bool) -> Reaction {
        self.state.low_bit_ambient = low_bit_ambient;
        Reaction::NONE
    }

    /// System time zone changed
    pub fn time_zone_changed(&mut self) -> Reaction {
        if !self.zone_listening {
            return Reaction::NONE;
        }
        Reaction {
            redraw: true,
            reevaluate_timer: false,
            refresh_time_zone: true,
        }
    }

    /// Wall clock stepped
    ///
    /// A pending tick was placed on the old timeline, so it is rescheduled;
    /// a visible face repaints with the corrected time.
    pub fn clock_adjusted(&mut self) -> Reaction {
        Reaction {
            redraw: self.state.visible,
            reevaluate_timer: true,
            refresh_time_zone: false,
        }
    }

    /// Host minute tick (the only repaint source while ambient)
    pub fn time_tick(&mut self) -> Reaction {
        if self.state.visible {
            Reaction::REDRAW
        } else {
            Reaction::NONE
        }
    }

    /// Dispatch a lifecycle notification
    pub fn apply(&mut self, event: LifecycleEvent) -> Reaction {
        match event {
            LifecycleEvent::VisibilityChanged(visible) => self.set_visible(visible),
            LifecycleEvent::AmbientModeChanged(ambient) => self.set_ambient(ambient),
            LifecycleEvent::PropertiesChanged { low_bit_ambient } => {
                self.set_low_bit_ambient(low_bit_ambient)
            }
            LifecycleEvent::TimeZoneChanged => self.time_zone_changed(),
            LifecycleEvent::ClockAdjusted => self.clock_adjusted(),
            LifecycleEvent::TimeTick => self.time_tick(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible_machine() -> ModeStateMachine {
        let mut machine = ModeStateMachine::new();
        machine.set_visible(true);
        machine
    }

    #[test]
    fn test_starts_hidden() {
        let machine = ModeStateMachine::new();
        assert_eq!(machine.mode(), DisplayMode::Hidden);
        assert!(!machine.should_animate());
        assert!(!machine.is_listening_for_zone());
    }

    #[test]
    fn test_show_lands_in_active() {
        let mut machine = ModeStateMachine::new();
        let reaction = machine.set_visible(true);

        assert_eq!(machine.mode(), DisplayMode::Active);
        assert!(machine.should_animate());
        assert!(reaction.redraw);
        assert!(reaction.reevaluate_timer);
        assert!(reaction.refresh_time_zone);
    }

    #[test]
    fn test_show_remembers_ambient_flag() {
        let mut machine = ModeStateMachine::new();

        // Ambient arrives while hidden: stored, nothing to repaint
        let reaction = machine.set_ambient(true);
        assert!(!reaction.redraw);
        assert_eq!(machine.mode(), DisplayMode::Hidden);

        machine.set_visible(true);
        assert_eq!(machine.mode(), DisplayMode::Ambient);
        assert!(!machine.should_animate());
    }

    #[test]
    fn test_hide_from_any_visible_state() {
        for ambient in [false, true] {
            let mut machine = visible_machine();
            machine.set_ambient(ambient);

            let reaction = machine.set_visible(false);
            assert_eq!(machine.mode(), DisplayMode::Hidden);
            assert!(!reaction.redraw);
            assert!(reaction.reevaluate_timer);
            assert!(!machine.is_listening_for_zone());
        }
    }

    #[test]
    fn test_ambient_toggle_redraws_only_on_change() {
        let mut machine = visible_machine();

        let enter = machine.set_ambient(true);
        assert!(enter.redraw);
        assert_eq!(machine.mode(), DisplayMode::Ambient);

        let repeat = machine.set_ambient(true);
        assert!(!repeat.redraw);
        assert!(repeat.reevaluate_timer);

        let leave = machine.set_ambient(false);
        assert!(leave.redraw);
        assert_eq!(machine.mode(), DisplayMode::Active);
    }

    #[test]
    fn test_zone_change_ignored_while_hidden() {
        let mut machine = ModeStateMachine::new();
        assert_eq!(machine.time_zone_changed(), Reaction::NONE);

        machine.set_visible(true);
        let reaction = machine.time_zone_changed();
        assert!(reaction.redraw);
        assert!(reaction.refresh_time_zone);
        assert!(!reaction.reevaluate_timer);
    }

    #[test]
    fn test_time_tick_repaints_when_visible() {
        let mut machine = ModeStateMachine::new();
        assert_eq!(machine.time_tick(), Reaction::NONE);

        machine.set_visible(true);
        machine.set_ambient(true);
        assert_eq!(machine.time_tick(), Reaction::REDRAW);
    }

    #[test]
    fn test_clock_adjusted_reschedules_tick() {
        let mut machine = ModeStateMachine::new();
        let hidden = machine.clock_adjusted();
        assert!(!hidden.redraw);
        assert!(hidden.reevaluate_timer);

        machine.set_visible(true);
        let visible = machine.apply(LifecycleEvent::ClockAdjusted);
        assert!(visible.redraw);
        assert!(visible.reevaluate_timer);
        assert!(!visible.refresh_time_zone);
    }

    #[test]
    fn test_low_bit_disables_anti_alias_in_ambient_only() {
        let mut machine = visible_machine();
        assert_eq!(machine.set_low_bit_ambient(true), Reaction::NONE);
        assert!(machine.state().anti_alias());

        machine.set_ambient(true);
        assert!(!machine.state().anti_alias());
    }

    #[test]
    fn test_apply_dispatches() {
        let mut machine = ModeStateMachine::new();
        machine.apply(LifecycleEvent::VisibilityChanged(true));
        machine.apply(LifecycleEvent::AmbientModeChanged(true));
        machine.apply(LifecycleEvent::PropertiesChanged {
            low_bit_ambient: true,
        });

        assert_eq!(
            machine.state(),
            DisplayState {
                visible: true,
                ambient: true,
                low_bit_ambient: true,
            }
        );
    }
}
