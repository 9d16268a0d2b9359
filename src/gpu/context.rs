// ============================================================================
// GPU CONTEXT: wgpu device, queue and adapter initialization
// ============================================================================

use std::sync::Arc;

/// Device and queue used by the GPU candidate evaluator
///
/// Cloning shares the same device. A context belongs to one adapter; create a
/// new one (and a new evaluator) if the device is lost.
#[derive(Clone, Debug)]
pub struct GpuContext {
    /// Logical device
    pub device: Arc<wgpu::Device>,
    /// Submission queue of `device`
    pub queue: Arc<wgpu::Queue>,
    /// Human-readable adapter name
    pub adapter_name: String,
    /// Largest 2-D texture edge the device accepts
    pub max_texture_dim: u32,
}

impl GpuContext {
    /// Attempt to create a headless GPU context
    ///
    /// Tries a hardware adapter first, then the software fallback adapter.
    /// Returns `None` when neither is available.
    pub fn new() -> Option<Self> {
        if let Some(ctx) = pollster::block_on(Self::new_async(false)) {
            return Some(ctx);
        }
        log::warn!("hardware adapter unavailable, trying software fallback");
        pollster::block_on(Self::new_async(true))
    }

    async fn new_async(force_fallback: bool) -> Option<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                // Headless: only off-screen targets are rendered
                compatible_surface: None,
                force_fallback_adapter: force_fallback,
            })
            .await?;

        let adapter_name = adapter.get_info().name;
        let limits = adapter.limits();

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("imagequilt device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits {
                        max_texture_dimension_2d: limits.max_texture_dimension_2d,
                        ..wgpu::Limits::downlevel_defaults()
                    },
                },
                None,
            )
            .await
            .map_err(|e| log::warn!("device request on '{adapter_name}' failed: {e}"))
            .ok()?;

        log::info!("using GPU adapter '{adapter_name}'");

        Some(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            adapter_name,
            max_texture_dim: limits.max_texture_dimension_2d,
        })
    }

    /// Check if a texture of the given dimensions can be created
    pub const fn supports_size(&self, width: u32, height: u32) -> bool {
        width <= self.max_texture_dim && height <= self.max_texture_dim
    }

    /// Submit a single encoder's commands
    pub fn submit_one(&self, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}
