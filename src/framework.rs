use std::io;

use raw_window_handle::{HasRawDisplayHandle, HasRawWindowHandle};

use crate::{
    adapter::{self, AdapterError, AdapterResult, AdapterSource},
    surface::SurfaceResult,
    Framework, SurfaceDescriptor,
};

/// Instance creation options.
#[derive(Debug, Clone)]
pub struct FrameworkConfig {
    pub backends: wgpu::Backends,
    pub power_preference: wgpu::PowerPreference,
    pub dx12_shader_compiler: wgpu::Dx12Compiler,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::PRIMARY,
            power_preference: wgpu::PowerPreference::HighPerformance,
            dx12_shader_compiler: wgpu::Dx12Compiler::default(),
        }
    }
}

impl FrameworkConfig {
    /// Reads `WGPU_BACKEND` and `WGPU_POWER_PREF`, keeping the defaults for
    /// whatever is unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backends: wgpu::util::backend_bits_from_env().unwrap_or(defaults.backends),
            power_preference: wgpu::util::power_preference_from_env()
                .unwrap_or(defaults.power_preference),
            ..defaults
        }
    }
}

impl Framework {
    pub fn new(config: FrameworkConfig) -> Self {
        log::debug!("creating instance with {:?}", config);
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: config.backends,
            dx12_shader_compiler: config.dx12_shader_compiler.clone(),
        });

        Framework { instance, config }
    }

    pub fn from_env() -> Self {
        Self::new(FrameworkConfig::from_env())
    }

    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }

    pub fn config(&self) -> &FrameworkConfig {
        &self.config
    }

    /// See [`adapter::enumerate_and_select`].
    pub fn enumerate_and_select(&self, out: &mut dyn io::Write) -> AdapterResult<wgpu::Adapter> {
        adapter::enumerate_and_select(self, out)
    }

    /// Lets the native library pick an adapter by the configured power
    /// preference, optionally restricted to ones that can present to `surface`.
    pub fn request_adapter(
        &self,
        compatible_surface: Option<&wgpu::Surface>,
    ) -> AdapterResult<wgpu::Adapter> {
        futures::executor::block_on(self.instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: self.config.power_preference,
                force_fallback_adapter: false,
                compatible_surface,
            },
        ))
        .ok_or(AdapterError::NoSuitableAdapter)
    }

    /// Opens a device with everything the adapter supports.
    pub fn request_device(
        &self,
        adapter: &wgpu::Adapter,
    ) -> AdapterResult<(wgpu::Device, wgpu::Queue)> {
        let info = adapter.get_info();
        let (device, queue) = futures::executor::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some(info.name.as_str()),
                features: adapter.features(),
                limits: adapter.limits(),
            },
            None,
        ))?;

        log::info!("opened device on {} ({:?})", info.name, info.backend);
        Ok((device, queue))
    }

    /// Hands a descriptor to the native surface-creation call.
    ///
    /// # Safety
    ///
    /// The handles in `desc` must be valid and must outlive the returned
    /// surface.
    pub unsafe fn create_surface(&self, desc: &SurfaceDescriptor) -> SurfaceResult<wgpu::Surface> {
        let surface = self.instance.create_surface(desc)?;
        log::info!("created {} surface", desc.kind());
        Ok(surface)
    }

    /// Selects the descriptor for `window` and creates a surface from it.
    ///
    /// # Safety
    ///
    /// `window` must outlive the returned surface.
    pub unsafe fn create_surface_for_window<W>(&self, window: &W) -> SurfaceResult<wgpu::Surface>
    where
        W: HasRawWindowHandle + HasRawDisplayHandle + ?Sized,
    {
        let desc = SurfaceDescriptor::try_from_window(window)?;
        self.create_surface(&desc)
    }
}

impl AdapterSource for Framework {
    type Adapter = wgpu::Adapter;

    fn enumerate_adapters(&self) -> Vec<wgpu::Adapter> {
        self.instance
            .enumerate_adapters(self.config.backends)
            .collect()
    }
}
