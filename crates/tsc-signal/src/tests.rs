//! Unit tests for phases, the controller, and the safety layer.

#[cfg(test)]
mod phase {
    use crate::phase::{Protection, SignalPhase, lanes_conflict, phase_serving};
    use tsc_core::{Approach, Lane, TurnMovement};

    #[test]
    fn index_bijection() {
        for phase in SignalPhase::ALL {
            assert_eq!(SignalPhase::from_index(phase.index()), Some(phase));
        }
        assert_eq!(SignalPhase::from_index(11), None);
        assert_eq!(SignalPhase::from_index(255), None);
    }

    /// No phase may grant two conflicting movements protected green at once.
    #[test]
    fn protected_grants_are_pairwise_compatible() {
        for phase in SignalPhase::ALL {
            let protected: Vec<Lane> = phase
                .vehicle_grants()
                .iter()
                .filter(|(_, p)| *p == Protection::Protected)
                .map(|(l, _)| *l)
                .collect();
            for (i, &a) in protected.iter().enumerate() {
                for &b in &protected[i + 1..] {
                    assert!(
                        !lanes_conflict(a, b),
                        "{phase:?} grants conflicting lanes {a} and {b}"
                    );
                }
            }
            // Crosswalks never share a phase with vehicles.
            if phase.is_pedestrian() {
                assert!(phase.vehicle_grants().is_empty());
            }
        }
    }

    #[test]
    fn conflict_rules() {
        let n_straight = Lane::new(Approach::North, TurnMovement::Straight);
        let s_straight = Lane::new(Approach::South, TurnMovement::Straight);
        let s_left = Lane::new(Approach::South, TurnMovement::Left);
        let n_left = Lane::new(Approach::North, TurnMovement::Left);
        let e_straight = Lane::new(Approach::East, TurnMovement::Straight);
        let e_right = Lane::new(Approach::East, TurnMovement::Right);
        let n_right = Lane::new(Approach::North, TurnMovement::Right);

        // Opposing straights coexist; a left crosses the opposing straight.
        assert!(!lanes_conflict(n_straight, s_straight));
        assert!(lanes_conflict(n_straight, s_left));
        assert!(!lanes_conflict(n_left, s_left));
        // Perpendicular traffic conflicts, except curb-hugging rights.
        assert!(lanes_conflict(n_straight, e_straight));
        assert!(lanes_conflict(n_left, e_right));
        assert!(!lanes_conflict(n_right, e_right));
        // Symmetry.
        assert_eq!(lanes_conflict(n_straight, s_left), lanes_conflict(s_left, n_straight));
    }

    #[test]
    fn serving_phase_grants_protected_green() {
        for lane in Lane::all() {
            let phase = phase_serving(lane);
            assert_eq!(
                phase.serves(lane),
                Some(Protection::Protected),
                "{phase:?} should serve {lane} protected"
            );
        }
    }

    #[test]
    fn clearances_conflict_with_nothing() {
        for clearance in [SignalPhase::AllRedClearance, SignalPhase::PedestrianClearance] {
            for other in SignalPhase::ALL {
                assert!(!clearance.conflicts_with(other));
            }
        }
    }

    #[test]
    fn crossing_axis_phases_conflict() {
        assert!(SignalPhase::NorthSouthThrough.conflicts_with(SignalPhase::EastWestThrough));
        assert!(SignalPhase::NorthSouthThrough.conflicts_with(SignalPhase::PedestrianScramble));
        assert!(SignalPhase::PedestrianScramble.conflicts_with(SignalPhase::EastWestThrough));
        // Dropping the shared lefts keeps the same protected movements running.
        assert!(
            !SignalPhase::NorthSouthSharedLeft.conflicts_with(SignalPhase::NorthSouthThrough)
        );
    }
}

#[cfg(test)]
mod controller {
    use crate::controller::{
        PhaseChange, PhaseController, PhaseRequest, PhaseTiming, TransitionDecision,
    };
    use crate::phase::SignalPhase;

    fn controller() -> PhaseController {
        PhaseController::new(PhaseTiming::default()).unwrap()
    }

    #[test]
    fn rejects_bad_timing() {
        let timing = PhaseTiming {
            min_green_secs: 61,
            max_green_secs: 60,
            ..PhaseTiming::default()
        };
        assert!(PhaseController::new(timing).is_err());
    }

    #[test]
    fn rejects_before_min_green() {
        let mut c = controller();
        for _ in 0..7 {
            c.advance(1);
            assert_eq!(
                c.request(PhaseRequest::new(SignalPhase::EastWestThrough)),
                TransitionDecision::Rejected
            );
        }
        c.advance(1); // elapsed = 8
        assert_eq!(
            c.request(PhaseRequest::new(SignalPhase::EastWestThrough)),
            TransitionDecision::Deferred
        );
    }

    #[test]
    fn noop_request_is_accepted_without_reset() {
        let mut c = controller();
        for _ in 0..10 {
            c.advance(1);
        }
        assert_eq!(
            c.request(PhaseRequest::new(SignalPhase::NorthSouthThrough)),
            TransitionDecision::Accepted
        );
        assert_eq!(c.elapsed_secs(), 10, "extension must not reset the green timer");
    }

    #[test]
    fn compatible_switch_is_immediate() {
        let mut c = controller();
        for _ in 0..8 {
            c.advance(1);
        }
        assert_eq!(
            c.request(PhaseRequest::new(SignalPhase::NorthSouthSharedLeft)),
            TransitionDecision::Accepted
        );
        assert_eq!(c.current(), SignalPhase::NorthSouthSharedLeft);
        assert_eq!(c.elapsed_secs(), 0);
    }

    #[test]
    fn conflicting_switch_runs_all_red_clearance() {
        let mut c = controller();
        for _ in 0..8 {
            c.advance(1);
        }
        assert_eq!(
            c.request(PhaseRequest::new(SignalPhase::EastWestThrough)),
            TransitionDecision::Deferred
        );
        assert_eq!(c.current(), SignalPhase::AllRedClearance);
        assert!(c.in_clearance());
        assert_eq!(c.pending_target(), Some(SignalPhase::EastWestThrough));

        // Nothing, not even a forced request, interrupts the handover.
        assert_eq!(
            c.request(PhaseRequest::forced(SignalPhase::DualLeftEastWest)),
            TransitionDecision::Rejected
        );

        assert_eq!(c.advance(1), None);
        assert_eq!(c.advance(1), None);
        assert_eq!(
            c.advance(1),
            Some(PhaseChange::ClearanceComplete(SignalPhase::EastWestThrough))
        );
        assert_eq!(c.current(), SignalPhase::EastWestThrough);
        assert!(!c.in_clearance());
    }

    #[test]
    fn scramble_exits_through_pedestrian_clearance() {
        let mut c = controller();
        for _ in 0..8 {
            c.advance(1);
        }
        c.request(PhaseRequest::new(SignalPhase::PedestrianScramble));
        assert_eq!(c.current(), SignalPhase::AllRedClearance);
        for _ in 0..3 {
            c.advance(1);
        }
        assert_eq!(c.current(), SignalPhase::PedestrianScramble);

        for _ in 0..8 {
            c.advance(1);
        }
        c.request(PhaseRequest::new(SignalPhase::NorthSouthThrough));
        assert_eq!(c.current(), SignalPhase::PedestrianClearance);
        // Pedestrian clearance holds for 5 s, not the vehicle 3 s.
        for _ in 0..4 {
            assert_eq!(c.advance(1), None);
        }
        assert_eq!(
            c.advance(1),
            Some(PhaseChange::ClearanceComplete(SignalPhase::NorthSouthThrough))
        );
    }

    #[test]
    fn forced_request_bypasses_min_green() {
        let mut c = controller();
        c.advance(1);
        assert_eq!(
            c.request(PhaseRequest::forced(SignalPhase::EastWestThrough)),
            TransitionDecision::Deferred
        );
        assert!(c.in_clearance());
    }

    #[test]
    fn max_green_forces_rotation() {
        let mut c = controller();
        let mut rotated = None;
        for _ in 0..60 {
            if let Some(change) = c.advance(1) {
                rotated = Some(change);
                break;
            }
            // Green never outlives the configured maximum.
            assert!(c.elapsed_secs() <= 60);
        }
        assert_eq!(
            rotated,
            Some(PhaseChange::MaxGreenRotation(SignalPhase::EastWestThrough))
        );
        // The rotation conflicts with the expiring phase, so it clears first.
        assert_eq!(c.current(), SignalPhase::AllRedClearance);
        assert_eq!(c.pending_target(), Some(SignalPhase::EastWestThrough));
    }
}

#[cfg(test)]
mod safety {
    use crate::controller::PhaseTiming;
    use crate::phase::SignalPhase;
    use crate::safety::{EnforcerInput, RuleTag, SafetyConfig, SafetyEnforcer};
    use tsc_core::{Approach, Lane, TurnMovement};

    fn enforcer() -> SafetyEnforcer {
        SafetyEnforcer::new(SafetyConfig::default()).unwrap()
    }

    fn quiet_input(requested: SignalPhase, current: SignalPhase) -> EnforcerInput {
        EnforcerInput {
            requested,
            current,
            in_clearance: false,
            emergency_lane: None,
            starved: None,
        }
    }

    #[test]
    fn rejects_bad_config() {
        let config = SafetyConfig {
            starvation_secs: 0,
            ..SafetyConfig::default()
        };
        assert!(SafetyEnforcer::new(config).is_err());

        let config = SafetyConfig {
            timing: PhaseTiming {
                min_green_secs: 0,
                ..PhaseTiming::default()
            },
            ..SafetyConfig::default()
        };
        assert!(SafetyEnforcer::new(config).is_err());
    }

    #[test]
    fn emergency_override_steers_to_serving_phase() {
        let lane = Lane::new(Approach::East, TurnMovement::Straight);
        let mut input = quiet_input(SignalPhase::NorthSouthThrough, SignalPhase::NorthSouthThrough);
        input.emergency_lane = Some(lane);

        let outcome = enforcer().evaluate(input);
        assert_eq!(outcome.request.target, SignalPhase::EastWestThrough);
        assert!(outcome.request.forced);
        assert!(outcome.triggered.contains(&RuleTag::EmergencyOverride));
        assert_eq!(outcome.risky_events(), 1);
    }

    #[test]
    fn emergency_already_served_holds_green() {
        let lane = Lane::new(Approach::North, TurnMovement::Straight);
        let mut input = quiet_input(SignalPhase::EastWestThrough, SignalPhase::NorthSouthThrough);
        input.emergency_lane = Some(lane);

        let outcome = enforcer().evaluate(input);
        assert_eq!(outcome.request.target, SignalPhase::NorthSouthThrough);
        assert!(!outcome.request.forced);
        assert!(outcome.triggered.is_empty());
    }

    #[test]
    fn emergency_defers_to_active_clearance() {
        let lane = Lane::new(Approach::East, TurnMovement::Left);
        let mut input = quiet_input(SignalPhase::NorthSouthThrough, SignalPhase::AllRedClearance);
        input.emergency_lane = Some(lane);
        input.in_clearance = true;

        let outcome = enforcer().evaluate(input);
        assert!(!outcome.triggered.contains(&RuleTag::EmergencyOverride));
    }

    #[test]
    fn starvation_forces_service() {
        let mut input = quiet_input(SignalPhase::NorthSouthThrough, SignalPhase::NorthSouthThrough);
        input.starved = Some((SignalPhase::DualLeftEastWest, 30));

        let outcome = enforcer().evaluate(input);
        assert_eq!(outcome.request.target, SignalPhase::DualLeftEastWest);
        assert!(outcome.request.forced);
        assert_eq!(outcome.triggered, vec![RuleTag::StarvationRelief]);
        // Working as designed, not a risky event.
        assert_eq!(outcome.risky_events(), 0);
    }

    #[test]
    fn starved_crosswalk_forces_the_scramble() {
        let mut input = quiet_input(SignalPhase::EastWestThrough, SignalPhase::EastWestThrough);
        input.starved = Some((SignalPhase::PedestrianScramble, 45));

        let outcome = enforcer().evaluate(input);
        assert_eq!(outcome.request.target, SignalPhase::PedestrianScramble);
        assert!(outcome.request.forced);
    }

    #[test]
    fn below_threshold_wait_passes_through() {
        let mut input = quiet_input(SignalPhase::NorthSouthThrough, SignalPhase::NorthSouthThrough);
        input.starved = Some((SignalPhase::DualLeftEastWest, 29));

        let outcome = enforcer().evaluate(input);
        assert_eq!(outcome.request.target, SignalPhase::NorthSouthThrough);
        assert!(outcome.triggered.is_empty());
    }

    #[test]
    fn conflicting_request_is_tagged_risky() {
        let outcome = enforcer().evaluate(quiet_input(
            SignalPhase::EastWestThrough,
            SignalPhase::NorthSouthThrough,
        ));
        assert_eq!(outcome.request.target, SignalPhase::EastWestThrough);
        assert_eq!(outcome.triggered, vec![RuleTag::ConflictingRequest]);
        assert_eq!(outcome.risky_events(), 1);
    }

    #[test]
    fn yield_gap_rule() {
        let e = enforcer(); // gap threshold 0
        assert!(e.yield_gap_open(0));
        assert!(!e.yield_gap_open(1));
    }
}
