//! Integration tests for the training loop.

#[cfg(test)]
mod trainer {
    use crate::metrics::CsvMetricsWriter;
    use crate::observer::{NoopObserver, TrainObserver};
    use crate::trainer::{EpisodeStats, Trainer, TrainerConfig};
    use tsc_agent::{AgentConfig, default_device};
    use tsc_sim::{EnvConfig, IntersectionState, TrafficEnv};

    type Backend = tsc_agent::DefaultBackend;

    fn short_env() -> TrafficEnv {
        TrafficEnv::new(EnvConfig {
            episode_ticks: 25,
            ..EnvConfig::default()
        })
        .unwrap()
    }

    fn small_agent_config() -> AgentConfig {
        AgentConfig {
            hidden_size: 16,
            batch_size: 8,
            replay_capacity: 512,
            ..AgentConfig::new(IntersectionState::FEATURES, 11)
        }
    }

    fn trainer(episodes: usize, warmup_steps: u64) -> Trainer<Backend, impl burn::optim::Optimizer<tsc_agent::QNetwork<Backend>, Backend>> {
        let agent = small_agent_config().init::<Backend>(default_device()).unwrap();
        Trainer::new(
            short_env(),
            agent,
            TrainerConfig {
                episodes,
                warmup_steps,
                log_interval: 100,
            },
        )
        .unwrap()
    }

    #[test]
    fn rejects_zero_episodes() {
        let agent = small_agent_config().init::<Backend>(default_device()).unwrap();
        let result = Trainer::new(
            short_env(),
            agent,
            TrainerConfig {
                episodes: 0,
                ..TrainerConfig::default()
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn runs_the_observe_act_step_learn_loop() {
        let mut trainer = trainer(3, 10);
        let stats = trainer.run(&mut NoopObserver).unwrap();

        assert_eq!(stats.len(), 3);
        for s in &stats {
            assert_eq!(s.steps, 25);
            assert!(s.total_reward.is_finite());
            assert!((0.01..=1.0).contains(&s.epsilon));
        }
        // Learning started once warmup and one batch were behind us.
        assert!(stats.last().unwrap().mean_loss.is_some());
        assert!(trainer.agent().replay_len() > 0);
    }

    #[test]
    fn observer_sees_every_episode() {
        struct Counting {
            episodes: Vec<usize>,
            finished: bool,
        }
        impl TrainObserver for Counting {
            fn on_episode_end(&mut self, stats: &EpisodeStats) {
                self.episodes.push(stats.episode);
            }
            fn on_training_end(&mut self, all: &[EpisodeStats]) {
                self.finished = all.len() == self.episodes.len();
            }
        }

        let mut observer = Counting { episodes: Vec::new(), finished: false };
        trainer(4, 10).run(&mut observer).unwrap();
        assert_eq!(observer.episodes, vec![0, 1, 2, 3]);
        assert!(observer.finished);
    }

    #[test]
    fn evaluation_leaves_the_replay_buffer_alone() {
        let mut trainer = trainer(1, 5);
        trainer.run(&mut NoopObserver).unwrap();
        let replay_before = trainer.agent().replay_len();

        let mean = trainer.evaluate(2).unwrap();
        assert!(mean.is_finite());
        assert_eq!(trainer.agent().replay_len(), replay_before);
    }

    #[test]
    fn metrics_file_gets_one_row_per_episode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episodes.csv");

        let mut writer = CsvMetricsWriter::new(&path).unwrap();
        trainer(3, 10).run(&mut writer).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 4, "header plus three episodes");
        assert!(lines[0].starts_with("episode,steps,total_reward"));
    }
}
