//! The action-value network: a small fully connected MLP.

use burn::nn::{Linear, LinearConfig, Relu};
use burn::prelude::*;

/// Architecture hyperparameters for [`QNetwork`].
#[derive(Copy, Clone, Debug)]
pub struct QNetworkConfig {
    /// Observation vector length.
    pub state_dim: usize,
    /// Width of the two hidden layers.
    pub hidden_size: usize,
    /// Number of discrete actions (output width).
    pub action_count: usize,
}

impl QNetworkConfig {
    pub fn new(state_dim: usize, action_count: usize) -> Self {
        Self {
            state_dim,
            hidden_size: 128,
            action_count,
        }
    }

    pub fn with_hidden_size(mut self, hidden_size: usize) -> Self {
        self.hidden_size = hidden_size;
        self
    }

    /// Initialize network parameters on `device`.
    pub fn init<B: Backend>(&self, device: &B::Device) -> QNetwork<B> {
        QNetwork {
            fc1: LinearConfig::new(self.state_dim, self.hidden_size).init(device),
            fc2: LinearConfig::new(self.hidden_size, self.hidden_size).init(device),
            fc3: LinearConfig::new(self.hidden_size, self.action_count).init(device),
            activation: Relu::new(),
        }
    }
}

/// `state → Q(state, ·)`: two ReLU hidden layers, one linear head per action.
#[derive(Module, Debug)]
pub struct QNetwork<B: Backend> {
    fc1: Linear<B>,
    fc2: Linear<B>,
    fc3: Linear<B>,
    activation: Relu,
}

impl<B: Backend> QNetwork<B> {
    /// Batched forward pass: `[batch, state_dim] → [batch, action_count]`.
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.activation.forward(self.fc1.forward(input));
        let x = self.activation.forward(self.fc2.forward(x));
        self.fc3.forward(x)
    }
}
