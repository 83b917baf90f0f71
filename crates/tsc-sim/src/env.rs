//! `TrafficEnv` — the environment boundary for controllers and learners.
//!
//! The contract mirrors the classic episodic RL loop: `reset` produces the
//! initial observation, `step` advances one tick under a phase request and
//! returns `(state, reward, done, info)`, and `snapshot` exposes the same
//! observation read-only for rendering collaborators.  Everything the step
//! touches is owned by the environment; callers interact only through these
//! three methods.

use tsc_core::{Approach, EntityId, EntityKind, Lane, SimClock, SimRng};
use tsc_reward::{RewardCalculator, RewardConfig, RewardInput};
use tsc_signal::{
    ConstraintOutcome, EnforcerInput, PhaseChange, PhaseController, Protection, RuleTag,
    SafetyConfig, SafetyEnforcer, SignalPhase, lanes_conflict,
};

use crate::arrivals::{ArrivalConfig, ArrivalEngine};
use crate::error::{SimError, SimResult};
use crate::queues::LaneQueues;
use crate::scheduler::{PriorityScheduler, SchedulerConfig};
use crate::state::IntersectionState;

// ── Action ────────────────────────────────────────────────────────────────────

/// An index into the 11-phase space: "request a transition to phase i".
/// Requesting the current phase is the extension idiom (a no-op accept).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action(pub u8);

impl Action {
    /// The phase this action requests, `None` for out-of-range indices.
    #[inline]
    pub fn phase(self) -> Option<SignalPhase> {
        SignalPhase::from_index(self.0)
    }
}

impl From<SignalPhase> for Action {
    fn from(phase: SignalPhase) -> Self {
        Action(phase.index())
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// Everything needed to construct a reproducible environment.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvConfig {
    /// Episode length; `done` turns true when this many ticks have run.
    pub episode_ticks: u64,
    pub seconds_per_tick: u32,
    pub seed: u64,
    pub arrivals: ArrivalConfig,
    pub safety: SafetyConfig,
    pub reward: RewardConfig,
    pub scheduler: SchedulerConfig,
    /// Pedestrian crossing window bounds, seconds.  The window opened on
    /// entering the scramble is `clamp(min + waiting, min, max)`.
    pub ped_window_min_secs: u32,
    pub ped_window_max_secs: u32,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            episode_ticks: 200,
            seconds_per_tick: 1,
            seed: 42,
            arrivals: ArrivalConfig::default(),
            safety: SafetyConfig::default(),
            reward: RewardConfig::default(),
            scheduler: SchedulerConfig::default(),
            ped_window_min_secs: 3,
            ped_window_max_secs: 10,
        }
    }
}

impl EnvConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.episode_ticks == 0 {
            return Err(SimError::Config("episode length must be positive".into()));
        }
        if self.seconds_per_tick == 0 {
            return Err(SimError::Config("tick duration must be positive".into()));
        }
        if self.ped_window_min_secs == 0 || self.ped_window_min_secs > self.ped_window_max_secs {
            return Err(SimError::Config(format!(
                "pedestrian window bounds [{}, {}] are malformed",
                self.ped_window_min_secs, self.ped_window_max_secs
            )));
        }
        self.arrivals.validate()?;
        self.safety.validate()?;
        self.reward.validate()?;
        self.scheduler.validate()?;
        Ok(())
    }
}

// ── Step outputs ──────────────────────────────────────────────────────────────

/// Side-channel diagnostics for one tick.
#[derive(Clone, Debug, Default)]
pub struct StepInfo {
    pub arrivals: usize,
    pub dispatched: usize,
    pub risky_events: usize,
    pub triggered: Vec<RuleTag>,
    pub total_queued: usize,
}

/// Result of advancing one tick.
#[derive(Clone, Debug)]
pub struct Step {
    pub state: IntersectionState,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

// ── Environment ───────────────────────────────────────────────────────────────

/// Crossing-window bookkeeping while the scramble is green.
struct PedWindow {
    remaining_secs: u32,
    total_secs: u32,
    /// Per-crosswalk cohort sizes at window open; only these pedestrians
    /// finish when the window expires.
    cohort: [usize; 4],
}

/// The single-intersection simulation.
pub struct TrafficEnv {
    config: EnvConfig,
    clock: SimClock,
    queues: LaneQueues,
    controller: PhaseController,
    enforcer: SafetyEnforcer,
    arrivals: ArrivalEngine,
    scheduler: PriorityScheduler,
    reward: RewardCalculator,
    ped_window: Option<PedWindow>,
    next_id: EntityId,
    steps_taken: u64,
}

impl TrafficEnv {
    /// Validate the whole configuration and build a ready environment.
    /// Construction is all-or-nothing: any invalid sub-config fails here.
    pub fn new(config: EnvConfig) -> SimResult<Self> {
        config.validate()?;

        let mut root = SimRng::new(config.seed);
        let arrivals = ArrivalEngine::new(config.arrivals, root.child(0))?;

        Ok(Self {
            clock: SimClock::new(config.seconds_per_tick),
            queues: LaneQueues::new(),
            controller: PhaseController::new(config.safety.timing)?,
            enforcer: SafetyEnforcer::new(config.safety)?,
            arrivals,
            scheduler: PriorityScheduler::new(config.scheduler)?,
            reward: RewardCalculator::new(config.reward)?,
            ped_window: None,
            next_id: EntityId::FIRST,
            steps_taken: 0,
            config,
        })
    }

    #[inline]
    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// Restart the episode.  The same seed replays the same arrivals.
    pub fn reset(&mut self) -> IntersectionState {
        let config = self.config;
        let mut root = SimRng::new(config.seed);
        // Sub-configs were validated at construction; rebuilding cannot fail.
        self.arrivals = ArrivalEngine::new(config.arrivals, root.child(0))
            .expect("validated config");
        self.controller = PhaseController::new(config.safety.timing).expect("validated config");
        self.clock = SimClock::new(config.seconds_per_tick);
        self.queues.clear();
        self.ped_window = None;
        self.next_id = EntityId::FIRST;
        self.steps_taken = 0;
        self.snapshot()
    }

    /// Read-only observation for rendering collaborators.
    pub fn snapshot(&self) -> IntersectionState {
        IntersectionState {
            tick: self.clock.current_tick,
            queue_lens: {
                let mut lens = [0u16; Lane::COUNT];
                for lane in Lane::all() {
                    lens[lane.index()] = self.queues.lane(lane).len() as u16;
                }
                lens
            },
            max_waits: self.queues.lane_max_waits(&self.clock),
            crosswalk_lens: {
                let mut lens = [0u16; 4];
                for approach in Approach::ALL {
                    lens[approach.index()] = self.queues.crosswalk(approach).len() as u16;
                }
                lens
            },
            crosswalk_waits: self.queues.crosswalk_max_waits(&self.clock),
            phase: self.controller.current(),
            elapsed_in_phase: self.controller.elapsed_secs(),
            ped_window_remaining: self.ped_window.as_ref().map_or(0, |w| w.remaining_secs),
            emergency: self.queues.emergency_flags(),
        }
    }

    /// Queue an entity directly, bypassing the arrival process.  Test-only:
    /// scenario tests need exact control over who is waiting where.
    #[cfg(test)]
    pub(crate) fn inject(
        &mut self,
        kind: EntityKind,
        approach: Approach,
        movement: tsc_core::TurnMovement,
    ) {
        let entity = crate::entity::Entity::new(
            self.next_id.take(),
            kind,
            approach,
            movement,
            self.clock.current_tick,
        );
        self.queues.push(entity);
    }

    /// Advance one tick under `action`.  An out-of-range action fails
    /// without touching any state.
    pub fn step(&mut self, action: Action) -> SimResult<Step> {
        let requested = action.phase().ok_or(SimError::InvalidAction(action.0))?;
        let dt = self.config.seconds_per_tick;

        // ① Arrivals.
        let arrived = self.arrivals.tick(&self.clock, &mut self.next_id);
        let arrival_count = arrived.len();
        for entity in arrived {
            self.queues.push(entity);
        }

        // ② Constraint evaluation.
        let prev_phase = self.controller.current();
        let prev_elapsed = self.controller.elapsed_secs();
        let ConstraintOutcome { request, mut triggered } =
            self.enforcer.evaluate(EnforcerInput {
                requested,
                current: prev_phase,
                in_clearance: self.controller.in_clearance(),
                emergency_lane: self.queues.emergency_lane(),
                starved: self.queues.starvation_candidate(prev_phase, &self.clock),
            });

        // ③ Signal update: submit the vetted request, then advance timers.
        self.controller.request(request);
        if let Some(PhaseChange::MaxGreenRotation(_)) = self.controller.advance(dt) {
            triggered.push(RuleTag::MaxGreenExpired);
        }
        let phase = self.controller.current();

        // ④ Crossing-window bookkeeping (open before dispatch so fresh
        //    scrambles serve pedestrians this very tick).
        if phase == SignalPhase::PedestrianScramble && self.ped_window.is_none() {
            let waiting = self.queues.pedestrians_waiting() as u32;
            let total = (self.config.ped_window_min_secs + waiting)
                .clamp(self.config.ped_window_min_secs, self.config.ped_window_max_secs);
            let mut cohort = [0usize; 4];
            for approach in Approach::ALL {
                cohort[approach.index()] = self.queues.crosswalk(approach).len();
            }
            self.ped_window = Some(PedWindow {
                remaining_secs: total,
                total_secs: total,
                cohort,
            });
        }

        // ⑤ Dispatch.  Gap checks read queue lengths, so resolve which
        //    yielding lanes see an open gap before handing the queues to the
        //    scheduler mutably.
        let window = self.ped_window.as_ref().map(|w| (w.remaining_secs, w.total_secs));
        let open_lanes: Vec<Lane> = phase
            .vehicle_grants()
            .iter()
            .filter(|&&(lane, protection)| match protection {
                Protection::Protected => true,
                Protection::Yielding => {
                    let conflicting: usize = phase
                        .vehicle_grants()
                        .iter()
                        .filter(|&&(other, p)| {
                            p == Protection::Protected && lanes_conflict(lane, other)
                        })
                        .map(|&(other, _)| self.queues.lane(other).len())
                        .sum();
                    self.enforcer.yield_gap_open(conflicting)
                }
            })
            .map(|&(lane, _)| lane)
            .collect();
        let served = self.scheduler.dispatch(
            phase,
            &mut self.queues,
            &self.clock,
            |lane| open_lanes.contains(&lane),
            window,
        );
        for entity in &served {
            if entity.kind == EntityKind::Pedestrian {
                if let Some(w) = self.ped_window.as_mut() {
                    let i = entity.approach.index();
                    w.cohort[i] = w.cohort[i].saturating_sub(1);
                }
            }
        }

        // Tick the window down; expiry releases the remaining cohort (they
        // finished crossing during the window).
        if let Some(w) = self.ped_window.as_mut() {
            w.remaining_secs = w.remaining_secs.saturating_sub(dt);
            if w.remaining_secs == 0 || phase != SignalPhase::PedestrianScramble {
                for approach in Approach::ALL {
                    let i = approach.index();
                    let crossed = w.cohort[i].min(self.queues.crosswalk(approach).len());
                    let queue = self.queues.crosswalk_mut(approach);
                    for _ in 0..crossed {
                        queue.pop_front();
                    }
                }
                self.ped_window = None;
            }
        }

        // ⑥ Reward.
        let phase_changed = phase != prev_phase;
        let lane_waits = self.queues.lane_max_waits(&self.clock);
        let crosswalk_waits = self.queues.crosswalk_max_waits(&self.clock);
        let mut all_waits = [0u32; Lane::COUNT + 4];
        all_waits[..Lane::COUNT].copy_from_slice(&lane_waits);
        all_waits[Lane::COUNT..].copy_from_slice(&crosswalk_waits);

        let risky_events = triggered.iter().filter(|t| t.is_risky()).count();
        let pedestrian_wait_secs = self.queues.pedestrians_waiting() as u32 * dt;
        let reward = self.reward.compute(&RewardInput {
            total_queue_len: self.queues.total_len(),
            lane_max_waits: &all_waits,
            risky_events,
            pedestrian_wait_secs,
            phase_changed,
            left_phase_after_secs: if phase_changed { prev_elapsed } else { 0 },
        });

        // Advance time and close out the tick.
        self.clock.advance();
        self.steps_taken += 1;
        let done = self.steps_taken >= self.config.episode_ticks;

        let state = self.snapshot();
        let info = StepInfo {
            arrivals: arrival_count,
            dispatched: served.len(),
            risky_events,
            triggered,
            total_queued: state.total_queued(),
        };
        Ok(Step { state, reward, done, info })
    }
}
