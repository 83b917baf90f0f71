//! Unit tests for tsc-core primitives.

#[cfg(test)]
mod ids {
    use crate::EntityId;

    #[test]
    fn take_is_monotone() {
        let mut next = EntityId::FIRST;
        assert_eq!(next.take(), EntityId(0));
        assert_eq!(next.take(), EntityId(1));
        assert_eq!(next, EntityId(2));
    }

    #[test]
    fn display() {
        assert_eq!(EntityId(7).to_string(), "E7");
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(15).since(Tick(10)), 5);
    }

    #[test]
    fn clock_elapsed() {
        let mut clock = SimClock::new(1);
        assert_eq!(clock.elapsed_secs(), 0);
        clock.advance();
        clock.advance();
        assert_eq!(clock.elapsed_secs(), 2);
    }

    #[test]
    fn ticks_for_secs_rounds_up() {
        let clock = SimClock::new(2);
        assert_eq!(clock.ticks_for_secs(3), 2);
        assert_eq!(clock.ticks_for_secs(4), 2);
    }

    #[test]
    fn hour_of_day_wraps() {
        let mut clock = SimClock::new(3_600); // 1 tick = 1 hour
        for _ in 0..25 {
            clock.advance();
        }
        assert_eq!(clock.hour_of_day(6), 7); // 6 + 25 mod 24
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            let a: f32 = r1.random();
            let b: f32 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn children_diverge() {
        let mut root = SimRng::new(1);
        let mut a = root.child(0);
        let mut b = root.child(1);
        let x: u64 = a.random();
        let y: u64 = b.random();
        assert_ne!(x, y, "sibling streams should not coincide");
    }

    #[test]
    fn gen_range_in_bounds() {
        let mut rng = SimRng::new(0);
        for _ in 0..1000 {
            let v = rng.gen_range(0.0f32..1.0);
            assert!((0.0..1.0).contains(&v));
        }
    }
}

#[cfg(test)]
mod traffic {
    use crate::{Approach, EntityKind, Lane, TurnMovement};

    #[test]
    fn opposites_pair_up() {
        for a in Approach::ALL {
            assert_eq!(a.opposite().opposite(), a);
            assert_ne!(a.opposite(), a);
        }
    }

    #[test]
    fn perpendicular_is_symmetric() {
        for a in Approach::ALL {
            for b in Approach::ALL {
                assert_eq!(a.is_perpendicular_to(b), b.is_perpendicular_to(a));
            }
        }
        assert!(Approach::North.is_perpendicular_to(Approach::East));
        assert!(!Approach::North.is_perpendicular_to(Approach::South));
        assert!(!Approach::North.is_perpendicular_to(Approach::North));
    }

    #[test]
    fn lane_indices_are_dense_and_unique() {
        let mut seen = [false; Lane::COUNT];
        for lane in Lane::all() {
            let i = lane.index();
            assert!(i < Lane::COUNT);
            assert!(!seen[i], "duplicate lane index {i}");
            seen[i] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn kind_labels() {
        assert_eq!(EntityKind::Emergency.as_str(), "emergency");
        assert_eq!(TurnMovement::Left.as_str(), "left");
    }
}
