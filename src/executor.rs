// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Mixed-sign matmul execution on a compute backend.
//!
//! Two strategies share one interface:
//! - [`DirectExecutor`] for adapters with a native uint8 x int8 kernel.
//! - [`CorrectedExecutor`] for signed-only adapters; it shifts A into int8 and
//!   adds `128 * colsum(B)` to the device result.
//!
//! The strategy is fixed when the executor is built ([`select_executor`]).
//! Every dispatch holds the device through a [`DeviceLease`], which closes it
//! on every exit path.

use crate::backend::{
    BackendKind, ComputeBackend, CpuBackend, CpuProfile, DType, DeviceHandle, HostTensor, Layout,
};
use crate::error::{Result, UpowError};
use crate::math::bias::{apply_bias_correction, column_sums, shift_to_signed};
use crate::pad::PaddedWorkload;
use crate::types::Matrix;

/// Exclusive hold on one open device. Closing happens in `release` or, failing
/// that, on drop.
pub struct DeviceLease<'a, B: ComputeBackend> {
    backend: &'a mut B,
    handle: Option<DeviceHandle>,
}

impl<'a, B: ComputeBackend> DeviceLease<'a, B> {
    pub fn open(backend: &'a mut B, device_id: u32) -> Result<Self> {
        let handle = backend.open(device_id)?;
        Ok(Self {
            backend,
            handle: Some(handle),
        })
    }

    pub fn handle(&self) -> Result<DeviceHandle> {
        self.handle
            .ok_or_else(|| UpowError::BackendExecution("Device lease already released".to_string()))
    }

    pub fn backend(&mut self) -> &mut B {
        &mut *self.backend
    }

    /// Closes the device and reports the close result.
    pub fn release(mut self) -> Result<()> {
        match self.handle.take() {
            Some(h) => self.backend.close(h),
            None => Ok(()),
        }
    }
}

impl<B: ComputeBackend> Drop for DeviceLease<'_, B> {
    fn drop(&mut self) {
        if let Some(h) = self.handle.take() {
            if let Err(e) = self.backend.close(h) {
                tracing::warn!(device_id = h.0, error = %e, "Failed to close device");
            }
        }
    }
}

/// Uploads, multiplies, synchronizes if required, and reads back.
fn run_leased<B: ComputeBackend>(
    lease: &mut DeviceLease<'_, B>,
    a: HostTensor,
    b: HostTensor,
    layout: Layout,
    needs_sync: bool,
) -> Result<Matrix<i32>> {
    let dev = lease.handle()?;
    let a_dtype = a.dtype();
    let b_dtype = b.dtype();
    let a_dev = lease.backend().to_device(dev, a, a_dtype, layout)?;
    let b_dev = lease.backend().to_device(dev, b, b_dtype, layout)?;
    let c_dev = lease.backend().matmul(dev, &a_dev, &b_dev, DType::I32)?;
    if needs_sync {
        lease.backend().synchronize(dev)?;
    }
    lease.backend().to_host(dev, c_dev)?.into_i32()
}

/// Runs one dispatch under a lease. The device is closed before returning,
/// whether or not the dispatch succeeded.
fn dispatch<B: ComputeBackend>(
    backend: &mut B,
    device_id: u32,
    a: HostTensor,
    b: HostTensor,
    layout: Layout,
) -> Result<Matrix<i32>> {
    let needs_sync = backend.capabilities().needs_sync;
    let mut lease = DeviceLease::open(backend, device_id)?;
    let outcome = run_leased(&mut lease, a, b, layout, needs_sync);

    match (outcome, lease.release()) {
        (Ok(c), Ok(())) => Ok(c),
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            tracing::warn!(error = %close_err, "Device close failed after dispatch error");
            Err(e)
        }
    }
}

pub trait MatmulExecutor {
    /// `"direct"` or `"corrected"`.
    fn strategy(&self) -> &'static str;
    fn backend_name(&self) -> &str;
    /// Tile size operands should be padded to.
    fn tile(&self) -> usize;
    /// Returns the logical `m x n` product of the padded operands.
    fn execute(&mut self, workload: &PaddedWorkload, device_id: u32) -> Result<Matrix<i32>>;
}

/// Backend multiplies uint8 x int8 natively; the result is used as-is.
pub struct DirectExecutor<B: ComputeBackend> {
    backend: B,
    layout: Layout,
}

impl<B: ComputeBackend> DirectExecutor<B> {
    pub fn new(backend: B) -> Result<Self> {
        let layout = backend
            .capabilities()
            .require(backend.name(), &[DType::U8, DType::I8, DType::I32])?;
        Ok(Self { backend, layout })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: ComputeBackend> MatmulExecutor for DirectExecutor<B> {
    fn strategy(&self) -> &'static str {
        "direct"
    }

    fn backend_name(&self) -> &str {
        self.backend.name()
    }

    fn tile(&self) -> usize {
        self.backend.capabilities().tile
    }

    fn execute(&mut self, workload: &PaddedWorkload, device_id: u32) -> Result<Matrix<i32>> {
        let padded = dispatch(
            &mut self.backend,
            device_id,
            HostTensor::U8(workload.a.clone()),
            HostTensor::I8(workload.b.clone()),
            self.layout,
        )?;
        workload.extract(&padded)
    }
}

/// Backend only multiplies int8 x int8; A is shifted by -128 and the result
/// corrected by `128 * colsum(B)`.
pub struct CorrectedExecutor<B: ComputeBackend> {
    backend: B,
    layout: Layout,
}

impl<B: ComputeBackend> CorrectedExecutor<B> {
    pub fn new(backend: B) -> Result<Self> {
        let layout = backend
            .capabilities()
            .require(backend.name(), &[DType::I8, DType::I32])?;
        Ok(Self { backend, layout })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: ComputeBackend> MatmulExecutor for CorrectedExecutor<B> {
    fn strategy(&self) -> &'static str {
        "corrected"
    }

    fn backend_name(&self) -> &str {
        self.backend.name()
    }

    fn tile(&self) -> usize {
        self.backend.capabilities().tile
    }

    fn execute(&mut self, workload: &PaddedWorkload, device_id: u32) -> Result<Matrix<i32>> {
        let a_signed = shift_to_signed(&workload.a);
        let padded = dispatch(
            &mut self.backend,
            device_id,
            HostTensor::I8(a_signed),
            HostTensor::I8(workload.b.clone()),
            self.layout,
        )?;

        let mut c = workload.extract(&padded)?;
        let colsum = column_sums(&workload.b);
        apply_bias_correction(&mut c, &colsum[..workload.logical.n])?;
        Ok(c)
    }
}

/// Picks the strategy from the adapter's declared capabilities.
pub fn select_executor<B>(backend: B) -> Result<Box<dyn MatmulExecutor>>
where
    B: ComputeBackend + 'static,
{
    let executor: Box<dyn MatmulExecutor> = if backend.capabilities().supports(DType::U8) {
        Box::new(DirectExecutor::new(backend)?)
    } else {
        Box::new(CorrectedExecutor::new(backend)?)
    };
    tracing::info!(
        backend = executor.backend_name(),
        strategy = executor.strategy(),
        "Executor selected"
    );
    Ok(executor)
}

pub fn build_executor(kind: BackendKind) -> Result<Box<dyn MatmulExecutor>> {
    match kind {
        BackendKind::CpuSigned => select_executor(CpuBackend::new(CpuProfile::SignedOnly)),
        BackendKind::CpuMixed => select_executor(CpuBackend::new(CpuProfile::Mixed)),
    }
}
