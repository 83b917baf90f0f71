//! The observable intersection snapshot and its feature encoding.

use tsc_core::{Lane, Tick};
use tsc_signal::SignalPhase;

/// Everything an external observer (agent, renderer) may see.
///
/// Snapshots are plain data: producing one never mutates the simulation, and
/// holding one grants no way to reach back into it.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectionState {
    pub tick: Tick,
    /// Queue length per vehicle lane, canonical lane order.
    pub queue_lens: [u16; Lane::COUNT],
    /// Longest wait per vehicle lane, seconds.
    pub max_waits: [u32; Lane::COUNT],
    /// Waiting pedestrians per crosswalk, approach order.
    pub crosswalk_lens: [u16; 4],
    /// Longest pedestrian wait per crosswalk, seconds.
    pub crosswalk_waits: [u32; 4],
    pub phase: SignalPhase,
    /// Seconds the active phase has held.
    pub elapsed_in_phase: u32,
    /// Seconds left of the pedestrian crossing window (0 when closed).
    pub ped_window_remaining: u32,
    /// Per-approach emergency-vehicle presence.
    pub emergency: [bool; 4],
}

// Normalization ceilings for the feature encoding.  Values beyond these
// saturate at 1.0; the network never sees the raw magnitudes.
const QUEUE_CEILING: f32 = 20.0;
const WAIT_CEILING: f32 = 120.0;
const ELAPSED_CEILING: f32 = 60.0;
const WINDOW_CEILING: f32 = 10.0;

impl IntersectionState {
    /// Length of the vector [`features`](Self::features) returns:
    /// 12 queue lengths + 12 waits + 4 crosswalk lengths + 4 crosswalk waits
    /// + 11 phase one-hot + elapsed + window + 4 emergency flags.
    pub const FEATURES: usize = Lane::COUNT * 2 + 4 * 2 + SignalPhase::COUNT + 2 + 4;

    /// Encode the snapshot as a fixed-length vector with every component in
    /// [0, 1], ready to feed a value network.
    pub fn features(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(Self::FEATURES);

        out.extend(self.queue_lens.iter().map(|&q| (q as f32 / QUEUE_CEILING).min(1.0)));
        out.extend(self.max_waits.iter().map(|&w| (w as f32 / WAIT_CEILING).min(1.0)));
        out.extend(
            self.crosswalk_lens
                .iter()
                .map(|&q| (q as f32 / QUEUE_CEILING).min(1.0)),
        );
        out.extend(
            self.crosswalk_waits
                .iter()
                .map(|&w| (w as f32 / WAIT_CEILING).min(1.0)),
        );

        for phase in SignalPhase::ALL {
            out.push(if phase == self.phase { 1.0 } else { 0.0 });
        }
        out.push((self.elapsed_in_phase as f32 / ELAPSED_CEILING).min(1.0));
        out.push((self.ped_window_remaining as f32 / WINDOW_CEILING).min(1.0));
        out.extend(self.emergency.iter().map(|&e| if e { 1.0 } else { 0.0 }));

        debug_assert_eq!(out.len(), Self::FEATURES);
        out
    }

    /// Total entities queued anywhere.
    pub fn total_queued(&self) -> usize {
        let v: u32 = self.queue_lens.iter().map(|&q| q as u32).sum();
        let p: u32 = self.crosswalk_lens.iter().map(|&q| q as u32).sum();
        (v + p) as usize
    }
}
