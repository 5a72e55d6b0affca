// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Compute backend capability interface.
//!
//! An accelerator is reached only through [`ComputeBackend`]. Each adapter
//! declares what it can do up front in [`Capabilities`]; executors pick their
//! strategy from that declaration once, at construction, instead of probing
//! the runtime per call.

pub mod cpu;

use crate::error::{Result, UpowError};
use crate::types::Matrix;
use std::fmt;
use std::str::FromStr;

pub use cpu::{CpuBackend, CpuProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    U8,
    I8,
    I32,
}

impl DType {
    pub fn name(&self) -> &'static str {
        match self {
            DType::U8 => "uint8",
            DType::I8 => "int8",
            DType::I32 => "int32",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    RowMajor,
    /// Outer dimensions must be multiples of the adapter's tile size.
    Tile,
}

impl Layout {
    pub fn name(&self) -> &'static str {
        match self {
            Layout::RowMajor => "row_major",
            Layout::Tile => "tile",
        }
    }
}

/// A host-side tensor, tagged with its element type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostTensor {
    U8(Matrix<u8>),
    I8(Matrix<i8>),
    I32(Matrix<i32>),
}

impl HostTensor {
    pub fn dtype(&self) -> DType {
        match self {
            HostTensor::U8(_) => DType::U8,
            HostTensor::I8(_) => DType::I8,
            HostTensor::I32(_) => DType::I32,
        }
    }

    pub fn dims(&self) -> (usize, usize) {
        match self {
            HostTensor::U8(m) => (m.rows(), m.cols()),
            HostTensor::I8(m) => (m.rows(), m.cols()),
            HostTensor::I32(m) => (m.rows(), m.cols()),
        }
    }

    pub fn into_i32(self) -> Result<Matrix<i32>> {
        match self {
            HostTensor::I32(m) => Ok(m),
            other => Err(UpowError::BackendExecution(format!(
                "Expected int32 result, device returned {}",
                other.dtype().name()
            ))),
        }
    }
}

/// What an adapter declares about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// Adapter interface version.
    pub version: u32,
    pub dtypes: Vec<DType>,
    /// Supported layouts, most preferred first.
    pub layouts: Vec<Layout>,
    pub tile: usize,
    /// Results must not be read back before `synchronize`.
    pub needs_sync: bool,
}

impl Capabilities {
    pub fn supports(&self, dtype: DType) -> bool {
        self.dtypes.contains(&dtype)
    }

    pub fn preferred_layout(&self) -> Option<Layout> {
        self.layouts.first().copied()
    }

    /// Fails with `DeviceUnavailable` naming every missing dtype.
    pub fn require(&self, backend: &str, dtypes: &[DType]) -> Result<Layout> {
        let missing: Vec<&str> = dtypes
            .iter()
            .filter(|d| !self.supports(**d))
            .map(DType::name)
            .collect();
        if !missing.is_empty() {
            return Err(UpowError::DeviceUnavailable(format!(
                "Backend '{}' lacks required dtypes: {}",
                backend,
                missing.join(", ")
            )));
        }
        self.preferred_layout().ok_or_else(|| {
            UpowError::DeviceUnavailable(format!(
                "Backend '{}' declares no layout (tried: {}, {})",
                backend,
                Layout::Tile.name(),
                Layout::RowMajor.name()
            ))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceHandle(pub u32);

/// Narrow interface to an accelerator runtime.
pub trait ComputeBackend {
    type Tensor;

    fn name(&self) -> &str;
    fn capabilities(&self) -> &Capabilities;

    fn open(&mut self, device_id: u32) -> Result<DeviceHandle>;
    fn close(&mut self, device: DeviceHandle) -> Result<()>;

    fn to_device(
        &mut self,
        device: DeviceHandle,
        host: HostTensor,
        dtype: DType,
        layout: Layout,
    ) -> Result<Self::Tensor>;

    fn matmul(
        &mut self,
        device: DeviceHandle,
        a: &Self::Tensor,
        b: &Self::Tensor,
        out: DType,
    ) -> Result<Self::Tensor>;

    fn to_host(&mut self, device: DeviceHandle, tensor: Self::Tensor) -> Result<HostTensor>;

    /// Only called when `capabilities().needs_sync` is set.
    fn synchronize(&mut self, _device: DeviceHandle) -> Result<()> {
        Ok(())
    }
}

/// Adapter selection, made from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// i8 x i8 -> i32 only, tiled, explicit sync.
    CpuSigned,
    /// Native u8 x i8 -> i32, row-major.
    CpuMixed,
}

impl BackendKind {
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::CpuSigned => "cpu-signed",
            BackendKind::CpuMixed => "cpu-mixed",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = UpowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu-signed" | "signed" => Ok(BackendKind::CpuSigned),
            "cpu-mixed" | "mixed" | "cpu" => Ok(BackendKind::CpuMixed),
            other => Err(UpowError::InvalidInput(format!(
                "Unknown backend '{}'. Expected cpu-signed or cpu-mixed",
                other
            ))),
        }
    }
}
