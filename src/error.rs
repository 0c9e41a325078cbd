//! Error types for trail setup.
//!
//! The simulation itself has no failure modes - every operation is numeric
//! and best-effort. Errors only arise while acquiring the drawing surface
//! and the event loop, and losing the surface is fatal to this feature
//! alone: the trail renders nothing and the host continues.

use std::fmt;

/// Errors that can occur while acquiring the drawing surface.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found"),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when running a trail overlay.
#[derive(Debug)]
pub enum TrailError {
    /// Failed to create or run the event loop.
    EventLoop(winit::error::EventLoopError),
    /// Drawing-surface acquisition failed.
    Gpu(GpuError),
}

impl fmt::Display for TrailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailError::EventLoop(e) => write!(f, "Failed to run event loop: {}", e),
            TrailError::Gpu(e) => write!(f, "GPU error: {}", e),
        }
    }
}

impl std::error::Error for TrailError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrailError::EventLoop(e) => Some(e),
            TrailError::Gpu(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for TrailError {
    fn from(e: winit::error::EventLoopError) -> Self {
        TrailError::EventLoop(e)
    }
}

impl From<GpuError> for TrailError {
    fn from(e: GpuError) -> Self {
        TrailError::Gpu(e)
    }
}
