// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Software adapter.
//!
//! Emulates an accelerator on the host. `SignedOnly` models an integer-limited
//! device: no uint8 operands, tile layout, and results that are not readable
//! until the device is synchronized. `Mixed` accepts uint8 x int8 directly.

use super::{Capabilities, ComputeBackend, DType, DeviceHandle, HostTensor, Layout};
use crate::config::TILE;
use crate::error::{Result, UpowError};
use crate::math::matmul::matmul_i32;

pub const CPU_ADAPTER_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuProfile {
    SignedOnly,
    Mixed,
}

#[derive(Debug)]
pub struct CpuTensor {
    device: DeviceHandle,
    layout: Layout,
    data: HostTensor,
    /// Written by a dispatch that has not been synchronized yet.
    pending: bool,
}

#[derive(Debug)]
pub struct CpuBackend {
    profile: CpuProfile,
    caps: Capabilities,
    device_count: u32,
    open: Option<DeviceHandle>,
    pending: bool,
}

impl CpuBackend {
    pub fn new(profile: CpuProfile) -> Self {
        let caps = match profile {
            CpuProfile::SignedOnly => Capabilities {
                version: CPU_ADAPTER_VERSION,
                dtypes: vec![DType::I8, DType::I32],
                layouts: vec![Layout::Tile, Layout::RowMajor],
                tile: TILE,
                needs_sync: true,
            },
            CpuProfile::Mixed => Capabilities {
                version: CPU_ADAPTER_VERSION,
                dtypes: vec![DType::U8, DType::I8, DType::I32],
                layouts: vec![Layout::RowMajor],
                tile: TILE,
                needs_sync: false,
            },
        };
        Self {
            profile,
            caps,
            device_count: 1,
            open: None,
            pending: false,
        }
    }

    pub fn with_device_count(mut self, count: u32) -> Self {
        self.device_count = count;
        self
    }

    pub fn profile(&self) -> CpuProfile {
        self.profile
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    fn check_device(&self, device: DeviceHandle) -> Result<()> {
        match self.open {
            Some(h) if h == device => Ok(()),
            _ => Err(UpowError::BackendExecution(format!(
                "Device {} is not open",
                device.0
            ))),
        }
    }

    fn check_tile(&self, what: &str, dim: usize) -> Result<()> {
        if dim % self.caps.tile != 0 {
            return Err(UpowError::BackendExecution(format!(
                "{} dimension {} is not a multiple of tile {}",
                what, dim, self.caps.tile
            )));
        }
        Ok(())
    }
}

impl ComputeBackend for CpuBackend {
    type Tensor = CpuTensor;

    fn name(&self) -> &str {
        match self.profile {
            CpuProfile::SignedOnly => "cpu-signed",
            CpuProfile::Mixed => "cpu-mixed",
        }
    }

    fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    fn open(&mut self, device_id: u32) -> Result<DeviceHandle> {
        if device_id >= self.device_count {
            return Err(UpowError::DeviceUnavailable(format!(
                "No device with id {} ({} available)",
                device_id, self.device_count
            )));
        }
        if let Some(h) = self.open {
            return Err(UpowError::DeviceUnavailable(format!(
                "Device {} is already open",
                h.0
            )));
        }
        let handle = DeviceHandle(device_id);
        self.open = Some(handle);
        self.pending = false;
        tracing::debug!(backend = self.name(), device_id, "Device opened");
        Ok(handle)
    }

    fn close(&mut self, device: DeviceHandle) -> Result<()> {
        self.check_device(device)?;
        self.open = None;
        self.pending = false;
        tracing::debug!(backend = self.name(), device_id = device.0, "Device closed");
        Ok(())
    }

    fn to_device(
        &mut self,
        device: DeviceHandle,
        host: HostTensor,
        dtype: DType,
        layout: Layout,
    ) -> Result<CpuTensor> {
        self.check_device(device)?;
        if !self.caps.supports(dtype) {
            return Err(UpowError::BackendExecution(format!(
                "dtype {} is not supported by {}",
                dtype.name(),
                self.name()
            )));
        }
        if host.dtype() != dtype {
            return Err(UpowError::BackendExecution(format!(
                "Host tensor is {}, requested {}",
                host.dtype().name(),
                dtype.name()
            )));
        }
        if !self.caps.layouts.contains(&layout) {
            return Err(UpowError::BackendExecution(format!(
                "Layout {} is not supported by {}",
                layout.name(),
                self.name()
            )));
        }
        Ok(CpuTensor {
            device,
            layout,
            data: host,
            pending: false,
        })
    }

    fn matmul(&mut self, device: DeviceHandle, a: &CpuTensor, b: &CpuTensor, out: DType) -> Result<CpuTensor> {
        self.check_device(device)?;
        if a.device != device || b.device != device {
            return Err(UpowError::BackendExecution(
                "Operands live on a different device".to_string(),
            ));
        }
        if out != DType::I32 {
            return Err(UpowError::BackendExecution(format!(
                "Unsupported output dtype {}",
                out.name()
            )));
        }
        if a.layout == Layout::Tile || b.layout == Layout::Tile {
            // K is shared and never padded; only the outer dimensions are tiled.
            self.check_tile("M", a.data.dims().0)?;
            self.check_tile("N", b.data.dims().1)?;
        }

        let product = match (&a.data, &b.data) {
            (HostTensor::I8(lhs), HostTensor::I8(rhs)) => matmul_i32(lhs, rhs),
            (HostTensor::U8(lhs), HostTensor::I8(rhs)) if self.caps.supports(DType::U8) => {
                matmul_i32(lhs, rhs)
            }
            (lhs, rhs) => {
                return Err(UpowError::BackendExecution(format!(
                    "No matmul kernel for {} x {}",
                    lhs.dtype().name(),
                    rhs.dtype().name()
                )))
            }
        }
        .map_err(|e| UpowError::BackendExecution(e.to_string()))?;

        self.pending = self.caps.needs_sync;
        Ok(CpuTensor {
            device,
            layout: a.layout,
            data: HostTensor::I32(product),
            pending: self.caps.needs_sync,
        })
    }

    fn to_host(&mut self, device: DeviceHandle, tensor: CpuTensor) -> Result<HostTensor> {
        self.check_device(device)?;
        if tensor.pending && self.pending {
            return Err(UpowError::BackendExecution(
                "Result read back before device synchronize".to_string(),
            ));
        }
        Ok(tensor.data)
    }

    fn synchronize(&mut self, device: DeviceHandle) -> Result<()> {
        self.check_device(device)?;
        self.pending = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Matrix;

    #[test]
    fn test_single_open_device() {
        let mut backend = CpuBackend::new(CpuProfile::Mixed);
        let h = backend.open(0).unwrap();
        assert!(matches!(backend.open(0), Err(UpowError::DeviceUnavailable(_))));
        backend.close(h).unwrap();
        assert!(!backend.is_open());
    }

    #[test]
    fn test_unknown_device_id() {
        let mut backend = CpuBackend::new(CpuProfile::Mixed);
        assert!(matches!(backend.open(3), Err(UpowError::DeviceUnavailable(_))));
    }

    #[test]
    fn test_signed_only_rejects_uint8() {
        let mut backend = CpuBackend::new(CpuProfile::SignedOnly);
        let h = backend.open(0).unwrap();
        let a = HostTensor::U8(Matrix::zeros(32, 4));
        let result = backend.to_device(h, a, DType::U8, Layout::Tile);
        assert!(matches!(result, Err(UpowError::BackendExecution(_))));
    }

    #[test]
    fn test_read_before_sync_fails() {
        let mut backend = CpuBackend::new(CpuProfile::SignedOnly);
        let h = backend.open(0).unwrap();
        let a = backend
            .to_device(h, HostTensor::I8(Matrix::zeros(32, 4)), DType::I8, Layout::Tile)
            .unwrap();
        let b = backend
            .to_device(h, HostTensor::I8(Matrix::zeros(4, 32)), DType::I8, Layout::Tile)
            .unwrap();
        let c = backend.matmul(h, &a, &b, DType::I32).unwrap();
        assert!(backend.to_host(h, c).is_err());

        let c = backend.matmul(h, &a, &b, DType::I32).unwrap();
        backend.synchronize(h).unwrap();
        let host = backend.to_host(h, c).unwrap();
        assert_eq!(host.dims(), (32, 32));
    }

    #[test]
    fn test_tile_layout_requires_aligned_outer_dims() {
        let mut backend = CpuBackend::new(CpuProfile::SignedOnly);
        let h = backend.open(0).unwrap();
        let a = backend
            .to_device(h, HostTensor::I8(Matrix::zeros(16, 4)), DType::I8, Layout::Tile)
            .unwrap();
        let b = backend
            .to_device(h, HostTensor::I8(Matrix::zeros(4, 32)), DType::I8, Layout::Tile)
            .unwrap();
        assert!(backend.matmul(h, &a, &b, DType::I32).is_err());
    }
}
