// Swipe navigation between editing tabs.

use egui::Pos2;
use retouch_core::Tab;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Thresholds for recognising a horizontal swipe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeGesture {
    /// Horizontal travel must exceed this.
    pub min_horizontal: f32,
    /// Vertical drift must stay below this.
    pub max_vertical: f32,
}

impl Default for SwipeGesture {
    fn default() -> Self {
        Self {
            min_horizontal: 50.0,
            max_vertical: 100.0,
        }
    }
}

impl SwipeGesture {
    pub fn classify(&self, start: Pos2, end: Pos2) -> Option<SwipeDirection> {
        let delta_x = end.x - start.x;
        let delta_y = (end.y - start.y).abs();
        trace!("Swipe delta x={} |y|={}", delta_x, delta_y);

        if delta_x.abs() > self.min_horizontal && delta_y < self.max_vertical {
            if delta_x > 0.0 {
                Some(SwipeDirection::Right)
            } else {
                Some(SwipeDirection::Left)
            }
        } else {
            None
        }
    }
}

/// Swiping left reveals the next tab, swiping right the previous one.
pub fn swipe_target(tab: Tab, direction: SwipeDirection) -> Option<Tab> {
    match direction {
        SwipeDirection::Left => tab.next(),
        SwipeDirection::Right => tab.previous(),
    }
}

/// Tracks one touch from start to end.
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    gesture: SwipeGesture,
    start: Option<Pos2>,
}

impl SwipeTracker {
    pub fn new(gesture: SwipeGesture) -> Self {
        Self {
            gesture,
            start: None,
        }
    }

    pub fn begin(&mut self, pos: Pos2) {
        self.start = Some(pos);
    }

    /// Finish the touch. The tracker is reset either way.
    pub fn finish(&mut self, pos: Pos2) -> Option<SwipeDirection> {
        let start = self.start.take()?;
        let direction = self.gesture.classify(start, pos);
        if let Some(direction) = direction {
            debug!("Recognised swipe {:?}", direction);
        }
        direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn horizontal_swipe_is_recognised() {
        let gesture = SwipeGesture::default();
        assert_eq!(
            gesture.classify(pos2(200.0, 100.0), pos2(120.0, 130.0)),
            Some(SwipeDirection::Left)
        );
        assert_eq!(
            gesture.classify(pos2(100.0, 100.0), pos2(151.0, 100.0)),
            Some(SwipeDirection::Right)
        );
    }

    #[test]
    fn short_or_diagonal_moves_are_ignored() {
        let gesture = SwipeGesture::default();
        assert_eq!(gesture.classify(pos2(100.0, 100.0), pos2(150.0, 100.0)), None);
        assert_eq!(gesture.classify(pos2(100.0, 100.0), pos2(300.0, 200.0)), None);
    }

    #[test]
    fn tracker_needs_a_start() {
        let mut tracker = SwipeTracker::default();
        assert_eq!(tracker.finish(pos2(0.0, 0.0)), None);

        tracker.begin(pos2(300.0, 0.0));
        assert_eq!(tracker.finish(pos2(0.0, 0.0)), Some(SwipeDirection::Left));
        // Reset after finishing.
        assert_eq!(tracker.finish(pos2(0.0, 0.0)), None);
    }

    #[test]
    fn targets_stop_at_the_ends() {
        assert_eq!(swipe_target(Tab::Retouch, SwipeDirection::Right), None);
        assert_eq!(swipe_target(Tab::Retouch, SwipeDirection::Left), Some(Tab::Adjust));
        assert_eq!(swipe_target(Tab::Crop, SwipeDirection::Left), None);
    }
}
