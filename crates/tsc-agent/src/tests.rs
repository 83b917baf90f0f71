//! Unit tests for the replay buffer, epsilon schedule, and agent.

#[cfg(test)]
mod replay {
    use crate::replay::{ReplayBuffer, Transition};
    use tsc_core::SimRng;

    fn transition(tag: u64) -> Transition {
        Transition {
            state: vec![tag as f32],
            action: (tag % 11) as u8,
            reward: -0.1,
            next_state: vec![tag as f32 + 1.0],
            done: false,
        }
    }

    #[test]
    fn overflow_evicts_the_oldest() {
        let mut buffer = ReplayBuffer::new(10_000);
        for i in 0..10_000 {
            buffer.push(transition(i));
        }
        assert_eq!(buffer.len(), 10_000);
        assert_eq!(buffer.oldest().unwrap().state[0], 0.0);

        buffer.push(transition(10_000));
        // Size is unchanged and the oldest entry is now the second-pushed.
        assert_eq!(buffer.len(), 10_000);
        assert_eq!(buffer.oldest().unwrap().state[0], 1.0);
    }

    #[test]
    fn sample_is_distinct_and_sized() {
        let mut buffer = ReplayBuffer::new(100);
        for i in 0..50 {
            buffer.push(transition(i));
        }
        let mut rng = SimRng::new(3);

        let batch = buffer.sample(32, &mut rng);
        assert_eq!(batch.len(), 32);
        let mut seen: Vec<u32> = batch.iter().map(|t| t.state[0] as u32).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 32, "sampling must not repeat transitions");
    }

    #[test]
    fn undersized_buffer_returns_everything() {
        let mut buffer = ReplayBuffer::new(100);
        for i in 0..5 {
            buffer.push(transition(i));
        }
        let mut rng = SimRng::new(3);
        assert_eq!(buffer.sample(32, &mut rng).len(), 5);
    }
}

#[cfg(test)]
mod schedule {
    use crate::schedule::EpsilonSchedule;

    #[test]
    fn decays_monotonically_to_the_floor() {
        let schedule = EpsilonSchedule::over_steps(1_000);
        assert_eq!(schedule.value(0), 1.0);

        let mut previous = f64::INFINITY;
        for step in 0..5_000 {
            let eps = schedule.value(step);
            assert!(eps <= previous, "epsilon rose at step {step}");
            assert!(eps >= 0.01, "epsilon fell below the floor at step {step}");
            previous = eps;
        }
        // Well past the configured horizon the floor holds exactly.
        assert_eq!(schedule.value(1_000_000), 0.01);
    }

    #[test]
    fn reaches_the_floor_near_the_horizon() {
        let schedule = EpsilonSchedule::over_steps(500);
        assert!(schedule.value(499) > 0.01);
        assert!((schedule.value(500) - 0.01).abs() < 1e-9);
    }

    #[test]
    fn rejects_malformed_bounds() {
        let bad = EpsilonSchedule {
            start: 0.5,
            floor: 0.9,
            decay: 0.99,
        };
        assert!(bad.validate().is_err());

        let bad = EpsilonSchedule {
            decay: 0.0,
            ..EpsilonSchedule::default()
        };
        assert!(bad.validate().is_err());
    }
}

#[cfg(test)]
mod agent {
    use crate::agent::AgentConfig;
    use crate::context::{TrainingContext, TrainingPhase};
    use crate::device::{DefaultBackend, default_device};
    use crate::replay::Transition;
    use crate::schedule::EpsilonSchedule;
    use tsc_core::SimRng;

    const STATE_DIM: usize = 6;
    const ACTIONS: usize = 11;

    fn small_config(seed: u64) -> AgentConfig {
        AgentConfig {
            hidden_size: 16,
            batch_size: 8,
            replay_capacity: 64,
            seed,
            ..AgentConfig::new(STATE_DIM, ACTIONS)
        }
    }

    fn observation(rng: &mut SimRng) -> Vec<f32> {
        (0..STATE_DIM).map(|_| rng.gen_range(0.0f32..1.0)).collect()
    }

    fn transition(rng: &mut SimRng) -> Transition {
        Transition {
            state: observation(rng),
            action: rng.gen_range(0..ACTIONS) as u8,
            reward: rng.gen_range(-1.0f32..0.0),
            next_state: observation(rng),
            done: rng.gen_bool(0.05),
        }
    }

    #[test]
    fn rejects_malformed_config() {
        let mut config = small_config(1);
        config.gamma = 1.5;
        assert!(config.init::<DefaultBackend>(default_device()).is_err());

        let mut config = small_config(1);
        config.replay_capacity = 4; // smaller than batch_size
        assert!(config.init::<DefaultBackend>(default_device()).is_err());

        let mut config = small_config(1);
        config.epsilon = EpsilonSchedule {
            floor: 2.0,
            ..EpsilonSchedule::default()
        };
        assert!(config.init::<DefaultBackend>(default_device()).is_err());
    }

    #[test]
    fn actions_stay_in_range() {
        let mut agent = small_config(11).init::<DefaultBackend>(default_device()).unwrap();
        let mut ctx = TrainingContext::new(TrainingPhase::Training);
        let mut rng = SimRng::new(0);
        for _ in 0..50 {
            let action = agent.act(&observation(&mut rng), &ctx);
            assert!((action as usize) < ACTIONS);
            ctx.record_step();
        }
    }

    #[test]
    fn greedy_evaluation_is_deterministic() {
        let mut agent = small_config(5).init::<DefaultBackend>(default_device()).unwrap();
        let ctx = TrainingContext::new(TrainingPhase::Evaluating);
        let mut rng = SimRng::new(2);
        let obs = observation(&mut rng);
        let first = agent.act(&obs, &ctx);
        for _ in 0..10 {
            assert_eq!(agent.act(&obs, &ctx), first);
        }
    }

    #[test]
    fn learn_is_a_noop_until_one_batch_exists() {
        let mut agent = small_config(3).init::<DefaultBackend>(default_device()).unwrap();
        let ctx = TrainingContext::new(TrainingPhase::Training);
        let mut rng = SimRng::new(4);

        for _ in 0..7 {
            agent.observe(transition(&mut rng));
            assert!(agent.learn(&ctx).is_none());
        }
        agent.observe(transition(&mut rng));
        let loss = agent.learn(&ctx).expect("one full batch stored");
        assert!(loss.is_finite() && loss >= 0.0);
    }

    #[test]
    fn evaluation_disables_learning() {
        let mut agent = small_config(3).init::<DefaultBackend>(default_device()).unwrap();
        let mut rng = SimRng::new(4);
        for _ in 0..32 {
            agent.observe(transition(&mut rng));
        }
        let ctx = TrainingContext::new(TrainingPhase::Evaluating);
        assert!(agent.learn(&ctx).is_none());
    }

    #[test]
    fn repeated_learning_steps_stay_finite() {
        let mut agent = small_config(9).init::<DefaultBackend>(default_device()).unwrap();
        let ctx = TrainingContext::new(TrainingPhase::Training);
        let mut rng = SimRng::new(8);
        for _ in 0..64 {
            agent.observe(transition(&mut rng));
        }
        for _ in 0..30 {
            let loss = agent.learn(&ctx).unwrap();
            assert!(loss.is_finite(), "diverged: {loss}");
        }
    }

    #[test]
    fn parameters_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent");

        let mut saved = small_config(21).init::<DefaultBackend>(default_device()).unwrap();
        saved.save_parameters(&path).unwrap();

        // A fresh agent starts from different random weights…
        let mut loaded = small_config(22).init::<DefaultBackend>(default_device()).unwrap();
        loaded.load_parameters(&path).unwrap();

        // …but after loading, greedy decisions match exactly.
        let ctx = TrainingContext::new(TrainingPhase::Evaluating);
        let mut rng = SimRng::new(33);
        for _ in 0..25 {
            let obs = observation(&mut rng);
            assert_eq!(saved.act(&obs, &ctx), loaded.act(&obs, &ctx));
        }
    }
}
