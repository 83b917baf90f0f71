//! Backend selection, resolved once per process.
//!
//! The default build computes on the CPU via the `ndarray` backend.  The
//! `wgpu` cargo feature swaps the default backend and device for the GPU;
//! nothing else in the workspace changes, because every consumer goes
//! through [`DefaultBackend`] and [`default_device`].

use std::sync::Once;

use burn::backend::Autodiff;

static RESOLVED: Once = Once::new();

#[cfg(not(feature = "wgpu"))]
mod backend {
    use super::*;
    use burn::backend::NdArray;
    use burn::backend::ndarray::NdArrayDevice;

    /// Autodiff-capable training backend.
    pub type DefaultBackend = Autodiff<NdArray>;

    /// Resolve the compute device.  Logged once; callers need not care
    /// whether an accelerator was available.
    pub fn default_device() -> NdArrayDevice {
        RESOLVED.call_once(|| {
            log::info!("accelerator support not compiled in; computing on the CPU (ndarray)");
        });
        NdArrayDevice::Cpu
    }
}

#[cfg(feature = "wgpu")]
mod backend {
    use super::*;
    use burn::backend::Wgpu;
    use burn::backend::wgpu::WgpuDevice;

    /// Autodiff-capable training backend.
    pub type DefaultBackend = Autodiff<Wgpu>;

    /// Resolve the compute device.  Logged once; callers need not care
    /// which adapter WGPU picked.
    pub fn default_device() -> WgpuDevice {
        RESOLVED.call_once(|| {
            log::info!("computing on the default WGPU adapter");
        });
        WgpuDevice::default()
    }
}

pub use backend::{DefaultBackend, default_device};
