//! The Double DQN agent.
//!
//! # Learning step
//!
//! Given a uniform replay minibatch, the update target is
//!
//!   y = r + γ · Q_target(s′, argmax_a Q_online(s′, a)) · (1 − done)
//!
//! The action choice comes from the *online* network, its price from the
//! *target* network — the double-estimator split that keeps the bootstrap
//! from chasing its own optimistic noise.  Targets are computed on the
//! inner (no-grad) backend; only the online prediction participates in
//! autodiff.  Adam with gradient-norm clipping applies the update, and the
//! target network is hard-synchronized from the online weights on a fixed
//! cadence.

use std::path::{Path, PathBuf};

use burn::grad_clipping::GradientClippingConfig;
use burn::module::{AutodiffModule, Module};
use burn::nn::loss::{MseLoss, Reduction};
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::record::{BinFileRecorder, FullPrecisionSettings};
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::{ElementConversion, Int, Tensor};

use tsc_core::SimRng;

use crate::context::{TrainingContext, TrainingPhase};
use crate::error::{AgentError, AgentResult};
use crate::network::{QNetwork, QNetworkConfig};
use crate::replay::{ReplayBuffer, Transition};
use crate::schedule::EpsilonSchedule;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Hyperparameters for [`DqnAgent`].
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Observation vector length.
    pub state_dim: usize,
    /// Discrete action space size.
    pub action_count: usize,
    pub hidden_size: usize,
    /// Discount factor γ.
    pub gamma: f64,
    pub learning_rate: f64,
    pub batch_size: usize,
    pub replay_capacity: usize,
    /// Learn steps between hard target-network syncs.
    pub target_sync_interval: u64,
    /// Gradient L2-norm ceiling.
    pub grad_clip_norm: f32,
    pub epsilon: EpsilonSchedule,
    pub seed: u64,
}

impl AgentConfig {
    pub fn new(state_dim: usize, action_count: usize) -> Self {
        Self {
            state_dim,
            action_count,
            hidden_size: 128,
            gamma: 0.99,
            learning_rate: 1e-3,
            batch_size: 32,
            replay_capacity: 10_000,
            target_sync_interval: 100,
            grad_clip_norm: 1.0,
            epsilon: EpsilonSchedule::default(),
            seed: 7,
        }
    }

    pub fn validate(&self) -> AgentResult<()> {
        if self.state_dim == 0 || self.action_count == 0 || self.hidden_size == 0 {
            return Err(AgentError::Config("network dimensions must be positive".into()));
        }
        if !(0.0 < self.gamma && self.gamma <= 1.0) {
            return Err(AgentError::Config(format!(
                "discount factor {} outside (0, 1]",
                self.gamma
            )));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(AgentError::Config(format!(
                "learning rate {} must be positive",
                self.learning_rate
            )));
        }
        if self.batch_size == 0 || self.replay_capacity < self.batch_size {
            return Err(AgentError::Config(format!(
                "replay capacity {} cannot hold batches of {}",
                self.replay_capacity, self.batch_size
            )));
        }
        if self.target_sync_interval == 0 {
            return Err(AgentError::Config("target sync interval must be positive".into()));
        }
        if !(self.grad_clip_norm.is_finite() && self.grad_clip_norm > 0.0) {
            return Err(AgentError::Config(format!(
                "gradient clip norm {} must be positive",
                self.grad_clip_norm
            )));
        }
        self.epsilon.validate()
    }

    /// Validate and build an agent on `device`.  All-or-nothing: a rejected
    /// config constructs no networks.
    pub fn init<B: AutodiffBackend>(
        &self,
        device: B::Device,
    ) -> AgentResult<DqnAgent<B, impl Optimizer<QNetwork<B>, B> + use<B>>> {
        self.validate()?;

        let network = QNetworkConfig::new(self.state_dim, self.action_count)
            .with_hidden_size(self.hidden_size);
        let online: QNetwork<B> = network.init(&device);
        let target = online.valid();
        let optimizer = AdamConfig::new()
            .with_grad_clipping(Some(GradientClippingConfig::Norm(self.grad_clip_norm)))
            .init::<B, QNetwork<B>>();

        let mut root = SimRng::new(self.seed);
        Ok(DqnAgent {
            replay: ReplayBuffer::new(self.replay_capacity),
            action_rng: root.child(0),
            sample_rng: root.child(1),
            config: self.clone(),
            device,
            online,
            target,
            optimizer,
            learn_steps: 0,
        })
    }
}

// ── Agent ─────────────────────────────────────────────────────────────────────

/// Double DQN over a discrete action space.
///
/// Observations are flat `f32` feature vectors; actions are indices in
/// `[0, action_count)`.  The replay buffer is owned exclusively by the
/// agent — callers feed it through [`observe`](Self::observe) only.
pub struct DqnAgent<B: AutodiffBackend, O: Optimizer<QNetwork<B>, B>> {
    config: AgentConfig,
    device: B::Device,
    online: QNetwork<B>,
    target: QNetwork<B::InnerBackend>,
    optimizer: O,
    replay: ReplayBuffer,
    action_rng: SimRng,
    sample_rng: SimRng,
    learn_steps: u64,
}

impl<B: AutodiffBackend, O: Optimizer<QNetwork<B>, B>> DqnAgent<B, O> {
    #[inline]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Transitions currently held in replay.
    #[inline]
    pub fn replay_len(&self) -> usize {
        self.replay.len()
    }

    /// The exploration rate `act` would use under `ctx`.
    pub fn epsilon(&self, ctx: &TrainingContext) -> f64 {
        match ctx.phase {
            TrainingPhase::Exploring => 1.0,
            TrainingPhase::Training => self.config.epsilon.value(ctx.env_steps),
            TrainingPhase::Evaluating => 0.0,
        }
    }

    /// Epsilon-greedy action selection.
    pub fn act(&mut self, observation: &[f32], ctx: &TrainingContext) -> u8 {
        debug_assert_eq!(observation.len(), self.config.state_dim);
        let epsilon = self.epsilon(ctx);
        if self.action_rng.gen_bool(epsilon) {
            return self.action_rng.gen_range(0..self.config.action_count) as u8;
        }

        let input = Tensor::<B::InnerBackend, 1>::from_floats(observation, &self.device)
            .reshape([1, self.config.state_dim]);
        let q = self.online.valid().forward(input);
        let best: i64 = q.argmax(1).into_scalar().elem();
        best as u8
    }

    /// Record one transition.
    pub fn observe(&mut self, transition: Transition) {
        debug_assert_eq!(transition.state.len(), self.config.state_dim);
        debug_assert_eq!(transition.next_state.len(), self.config.state_dim);
        self.replay.push(transition);
    }

    /// One gradient step, if enough experience exists.
    ///
    /// Returns the minibatch loss, or `None` when learning is disabled
    /// (evaluation) or the buffer is still below one batch — the latter is
    /// a quiet no-op, not an error.
    pub fn learn(&mut self, ctx: &TrainingContext) -> Option<f32> {
        if ctx.phase == TrainingPhase::Evaluating {
            return None;
        }
        if self.replay.len() < self.config.batch_size {
            return None;
        }

        let batch = self.replay.sample(self.config.batch_size, &mut self.sample_rng);
        let n = batch.len();
        let dim = self.config.state_dim;

        let mut states = Vec::with_capacity(n * dim);
        let mut next_states = Vec::with_capacity(n * dim);
        let mut actions = Vec::with_capacity(n);
        let mut rewards = Vec::with_capacity(n);
        let mut not_done = Vec::with_capacity(n);
        for t in &batch {
            states.extend_from_slice(&t.state);
            next_states.extend_from_slice(&t.next_state);
            actions.push(t.action as i32);
            rewards.push(t.reward);
            not_done.push(if t.done { 0.0f32 } else { 1.0 });
        }
        let device = &self.device;

        // Double-DQN target, no-grad backend: online picks, target prices.
        let next_t = Tensor::<B::InnerBackend, 1>::from_floats(next_states.as_slice(), device)
            .reshape([n, dim]);
        let next_actions = self.online.valid().forward(next_t.clone()).argmax(1);
        let next_q: Tensor<B::InnerBackend, 1> =
            self.target.forward(next_t).gather(1, next_actions).flatten(0, 1);
        let rewards_t = Tensor::<B::InnerBackend, 1>::from_floats(rewards.as_slice(), device);
        let not_done_t = Tensor::<B::InnerBackend, 1>::from_floats(not_done.as_slice(), device);
        let targets_inner = rewards_t + next_q.mul(not_done_t).mul_scalar(self.config.gamma);
        let targets = Tensor::<B, 1>::from_inner(targets_inner);

        let states_t =
            Tensor::<B, 1>::from_floats(states.as_slice(), device).reshape([n, dim]);
        let actions_t = Tensor::<B, 1, Int>::from_ints(actions.as_slice(), device).reshape([n, 1]);
        let predicted: Tensor<B, 1> =
            self.online.forward(states_t).gather(1, actions_t).flatten(0, 1);

        let loss = MseLoss::new().forward(predicted, targets, Reduction::Mean);
        let loss_value: f32 = loss.clone().into_scalar().elem();

        let grads = GradientsParams::from_grads(loss.backward(), &self.online);
        self.online = self
            .optimizer
            .step(self.config.learning_rate, self.online.clone(), grads);

        self.learn_steps += 1;
        if self.learn_steps % self.config.target_sync_interval == 0 {
            self.target = self.online.valid();
        }
        Some(loss_value)
    }

    // ── Checkpointing ─────────────────────────────────────────────────────

    /// Persist online and target parameters as `<path>-online.bin` and
    /// `<path>-target.bin`.
    pub fn save_parameters<P: AsRef<Path>>(&self, path: P) -> AgentResult<()> {
        let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
        self.online
            .clone()
            .save_file(suffixed(path.as_ref(), "online"), &recorder)
            .map_err(|e| AgentError::Checkpoint(e.to_string()))?;
        self.target
            .clone()
            .save_file(suffixed(path.as_ref(), "target"), &recorder)
            .map_err(|e| AgentError::Checkpoint(e.to_string()))?;
        Ok(())
    }

    /// Restore parameters written by [`save_parameters`](Self::save_parameters).
    /// Greedy `act` outputs are identical after a round trip.
    pub fn load_parameters<P: AsRef<Path>>(&mut self, path: P) -> AgentResult<()> {
        let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
        self.online = self
            .online
            .clone()
            .load_file(suffixed(path.as_ref(), "online"), &recorder, &self.device)
            .map_err(|e| AgentError::Checkpoint(e.to_string()))?;
        self.target = self
            .target
            .clone()
            .load_file(suffixed(path.as_ref(), "target"), &recorder, &self.device)
            .map_err(|e| AgentError::Checkpoint(e.to_string()))?;
        Ok(())
    }
}

/// `"agent"` → `"agent-online"`, keeping directories intact.  The recorder
/// appends its own `.bin` extension.
fn suffixed(path: &Path, which: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!("-{which}"));
    PathBuf::from(name)
}
