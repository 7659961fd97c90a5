//! Motion-towards tracking for side-opening popups.
//!
//! When the pointer leaves a submenu's parent item, it usually crosses other
//! items on its way to the submenu. As long as it keeps moving into the wedge
//! spanned by the popup's near edge, and the time budget lasts, the popup
//! stays open.

use std::time::Instant;

use crate::config::UiConfig;
use crate::geometry::{Offset, Region};

use super::Direction;

/// Tracks where the pointer was when it left the popup's zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionTowards {
    origin: Offset,
    started: Instant,
}

impl MotionTowards {
    pub fn start(origin: Offset, now: Instant) -> Self {
        Self { origin, started: now }
    }

    pub fn origin(&self) -> Offset {
        self.origin
    }

    pub fn deadline(&self, config: &UiConfig) -> Instant {
        self.started + config.towards_budget()
    }

    pub fn expired(&self, now: Instant, config: &UiConfig) -> bool {
        now >= self.deadline(config)
    }

    /// Whether motion from the origin to `pos` heads into `target`, a popup
    /// opened in `direction`. Only sideways popups are tracked.
    pub fn is_heading(&self, pos: Offset, now: Instant, target: Region, direction: Direction, config: &UiConfig) -> bool {
        if self.expired(now, config) {
            return false;
        }
        let edge_x = match direction {
            Direction::Right => target.x,
            Direction::Left => target.right(),
            Direction::Down | Direction::Up => return false,
        };
        let d = pos - self.origin;
        if d.x.abs() + d.y.abs() <= config.towards_threshold_px {
            return true;
        }
        let slack = config.towards_corner_slack_px;
        let a = Offset::new(edge_x, target.y - slack) - self.origin;
        let b = Offset::new(edge_x, target.bottom() + slack) - self.origin;
        let ab = a.cross(b).signum();
        a.cross(d).signum() * ab >= 0 && d.cross(b).signum() * ab >= 0
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn submenu() -> Region {
        Region::new(100, 40, 80, 100)
    }

    #[test]
    fn moving_toward_the_popup_counts() {
        let config = UiConfig::default();
        let t0 = Instant::now();
        let m = MotionTowards::start(Offset::new(60, 50), t0);
        assert!(m.is_heading(Offset::new(70, 55), t0, submenu(), Direction::Right, &config));
        assert!(m.is_heading(Offset::new(70, 70), t0, submenu(), Direction::Right, &config));
    }

    #[test]
    fn moving_away_does_not() {
        let config = UiConfig::default();
        let t0 = Instant::now();
        let m = MotionTowards::start(Offset::new(60, 50), t0);
        assert!(!m.is_heading(Offset::new(40, 50), t0, submenu(), Direction::Right, &config));
        assert!(!m.is_heading(Offset::new(62, 0), t0, submenu(), Direction::Right, &config));
    }

    #[test]
    fn small_motion_is_not_judged() {
        let config = UiConfig::default();
        let t0 = Instant::now();
        let m = MotionTowards::start(Offset::new(60, 50), t0);
        assert!(m.is_heading(Offset::new(58, 49), t0, submenu(), Direction::Right, &config));
    }

    #[test]
    fn budget_expires() {
        let config = UiConfig::default().with_towards_budget(100);
        let t0 = Instant::now();
        let m = MotionTowards::start(Offset::new(60, 50), t0);
        let late = t0 + Duration::from_millis(100);
        assert!(m.expired(late, &config));
        assert!(!m.is_heading(Offset::new(70, 55), late, submenu(), Direction::Right, &config));
    }

    #[test]
    fn left_popups_use_their_right_edge() {
        let config = UiConfig::default();
        let t0 = Instant::now();
        let m = MotionTowards::start(Offset::new(220, 50), t0);
        assert!(m.is_heading(Offset::new(200, 60), t0, submenu(), Direction::Left, &config));
        assert!(!m.is_heading(Offset::new(240, 60), t0, submenu(), Direction::Left, &config));
    }

    #[test]
    fn downward_popups_are_not_tracked() {
        let config = UiConfig::default();
        let t0 = Instant::now();
        let m = MotionTowards::start(Offset::new(60, 50), t0);
        assert!(!m.is_heading(Offset::new(60, 50), t0, submenu(), Direction::Down, &config));
    }
}
