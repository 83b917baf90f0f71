//! The episodic training loop and the greedy evaluator.

use burn::optim::Optimizer;
use burn::tensor::backend::AutodiffBackend;

use tsc_agent::{DqnAgent, QNetwork, TrainingContext, TrainingPhase, Transition};
use tsc_sim::{Action, TrafficEnv};

use crate::error::{TrainError, TrainResult};
use crate::observer::TrainObserver;

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
pub struct TrainerConfig {
    pub episodes: usize,
    /// Environment steps acted uniformly at random before epsilon-greedy
    /// training begins (seeds the replay buffer with diverse experience).
    pub warmup_steps: u64,
    /// Episodes between progress log lines.
    pub log_interval: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            episodes: 300,
            warmup_steps: 200,
            log_interval: 50,
        }
    }
}

impl TrainerConfig {
    pub fn validate(&self) -> TrainResult<()> {
        if self.episodes == 0 {
            return Err(TrainError::Config("episode count must be positive".into()));
        }
        if self.log_interval == 0 {
            return Err(TrainError::Config("log interval must be positive".into()));
        }
        Ok(())
    }
}

// ── Episode statistics ────────────────────────────────────────────────────────

/// Summary of one completed training episode.
#[derive(Clone, Debug)]
pub struct EpisodeStats {
    pub episode: usize,
    pub steps: u32,
    pub total_reward: f64,
    /// Mean minibatch loss across the episode's learn steps, if any ran.
    pub mean_loss: Option<f32>,
    /// Exploration rate at episode end.
    pub epsilon: f64,
}

// ── Trainer ───────────────────────────────────────────────────────────────────

/// Drives agent–environment interaction for a configured number of episodes.
pub struct Trainer<B: AutodiffBackend, O: Optimizer<QNetwork<B>, B>> {
    env: TrafficEnv,
    agent: DqnAgent<B, O>,
    config: TrainerConfig,
}

impl<B: AutodiffBackend, O: Optimizer<QNetwork<B>, B>> Trainer<B, O> {
    pub fn new(env: TrafficEnv, agent: DqnAgent<B, O>, config: TrainerConfig) -> TrainResult<Self> {
        config.validate()?;
        Ok(Self { env, agent, config })
    }

    #[inline]
    pub fn env(&self) -> &TrafficEnv {
        &self.env
    }

    #[inline]
    pub fn agent(&self) -> &DqnAgent<B, O> {
        &self.agent
    }

    #[inline]
    pub fn agent_mut(&mut self) -> &mut DqnAgent<B, O> {
        &mut self.agent
    }

    /// Train for the configured number of episodes, reporting each one to
    /// `observer`.  Returns the per-episode statistics.
    pub fn run<Obs: TrainObserver>(&mut self, observer: &mut Obs) -> TrainResult<Vec<EpisodeStats>> {
        let mut ctx = TrainingContext::new(TrainingPhase::Exploring);
        let mut all_stats = Vec::with_capacity(self.config.episodes);

        for episode in 0..self.config.episodes {
            let mut features = self.env.reset().features();
            let mut total_reward = 0.0;
            let mut steps = 0u32;
            let mut loss_sum = 0.0f64;
            let mut loss_count = 0u32;

            loop {
                if ctx.phase == TrainingPhase::Exploring && ctx.env_steps >= self.config.warmup_steps
                {
                    ctx.phase = TrainingPhase::Training;
                }

                let action = self.agent.act(&features, &ctx);
                let step = self.env.step(Action(action))?;
                let next_features = step.state.features();

                self.agent.observe(Transition {
                    state: features,
                    action,
                    reward: step.reward as f32,
                    next_state: next_features.clone(),
                    done: step.done,
                });
                if let Some(loss) = self.agent.learn(&ctx) {
                    loss_sum += loss as f64;
                    loss_count += 1;
                }

                ctx.record_step();
                total_reward += step.reward;
                steps += 1;
                features = next_features;

                if step.done {
                    break;
                }
            }

            let stats = EpisodeStats {
                episode,
                steps,
                total_reward,
                mean_loss: (loss_count > 0).then(|| (loss_sum / loss_count as f64) as f32),
                epsilon: self.agent.epsilon(&ctx),
            };
            if (episode + 1) % self.config.log_interval == 0 {
                log::info!(
                    "episode {:>4}: reward {:8.2}, epsilon {:.3}, replay {}",
                    episode + 1,
                    stats.total_reward,
                    stats.epsilon,
                    self.agent.replay_len(),
                );
            }
            observer.on_episode_end(&stats);
            all_stats.push(stats);
        }

        observer.on_training_end(&all_stats);
        Ok(all_stats)
    }

    /// Run `episodes` greedy episodes (no exploration, no learning) and
    /// return the mean episode reward.
    pub fn evaluate(&mut self, episodes: usize) -> TrainResult<f64> {
        if episodes == 0 {
            return Err(TrainError::Config("evaluation needs at least one episode".into()));
        }
        let ctx = TrainingContext::new(TrainingPhase::Evaluating);
        let mut total = 0.0;

        for _ in 0..episodes {
            let mut features = self.env.reset().features();
            loop {
                let action = self.agent.act(&features, &ctx);
                let step = self.env.step(Action(action))?;
                total += step.reward;
                features = step.state.features();
                if step.done {
                    break;
                }
            }
        }
        Ok(total / episodes as f64)
    }
}
