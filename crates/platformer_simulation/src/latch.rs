//! SignalLatch — single-slot сигнал между frame rate и physics rate
//!
//! Frame callback поднимает флаг (`raise`), physics step забирает его
//! (`take_if`). Между двумя кадрами может пройти 0..N physics steps, поэтому
//! сигнал нельзя читать "мгновенно": он живёт до первого успешного consume.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct SignalLatch {
    raised: bool,
    /// Секунды с момента raise (считаются только physics steps без consume)
    age: f32,
}

impl SignalLatch {
    /// Поднять сигнал. Повторный raise перезапускает возраст.
    pub fn raise(&mut self) {
        self.raised = true;
        self.age = 0.0;
    }

    pub fn is_raised(&self) -> bool {
        self.raised
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    /// Забирает сигнал только если `ready`. true = сигнал был и теперь снят.
    pub fn take_if(&mut self, ready: bool) -> bool {
        if self.raised && ready {
            self.clear();
            true
        } else {
            false
        }
    }

    /// Состаривает невостребованный сигнал; `expiry = None` — вечный.
    pub fn age_by(&mut self, dt: f32, expiry: Option<f32>) {
        if !self.raised {
            return;
        }

        self.age += dt;
        if let Some(expiry) = expiry {
            if self.age > expiry {
                self.clear();
            }
        }
    }

    pub fn clear(&mut self) {
        self.raised = false;
        self.age = 0.0;
    }
}

/// Edge detector: true только на кадре перехода released → pressed
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct EdgeTrigger {
    was_pressed: bool,
}

impl EdgeTrigger {
    pub fn just_pressed(&mut self, pressed: bool) -> bool {
        let edge = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        edge
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_requires_ready() {
        let mut latch = SignalLatch::default();
        latch.raise();

        assert!(!latch.take_if(false));
        assert!(latch.is_raised(), "not ready → signal persists");

        assert!(latch.take_if(true));
        assert!(!latch.is_raised());

        // Consumed at most once
        assert!(!latch.take_if(true));
    }

    #[test]
    fn test_latch_survives_many_steps_without_expiry() {
        let mut latch = SignalLatch::default();
        latch.raise();

        for _ in 0..10_000 {
            latch.age_by(1.0 / 60.0, None);
        }

        assert!(latch.is_raised());
        assert!(latch.age() > 100.0);
    }

    #[test]
    fn test_latch_expires_after_buffer() {
        let mut latch = SignalLatch::default();
        latch.raise();

        latch.age_by(0.05, Some(0.1));
        assert!(latch.is_raised());

        latch.age_by(0.05, Some(0.1));
        assert!(latch.is_raised(), "exactly at the window edge is still alive");

        latch.age_by(0.05, Some(0.1));
        assert!(!latch.is_raised());
        assert_eq!(latch.age(), 0.0);
    }

    #[test]
    fn test_raise_restarts_age() {
        let mut latch = SignalLatch::default();
        latch.raise();
        latch.age_by(0.08, Some(0.1));
        latch.raise();
        latch.age_by(0.08, Some(0.1));
        assert!(latch.is_raised());
    }

    #[test]
    fn test_edge_trigger_press_not_hold() {
        let mut edge = EdgeTrigger::default();
        assert!(!edge.just_pressed(false));
        assert!(edge.just_pressed(true));
        assert!(!edge.just_pressed(true), "hold does not retrigger");
        assert!(!edge.just_pressed(false));
        assert!(edge.just_pressed(true));
    }
}
