use std::{
    ffi::c_void,
    os::raw::c_ulong,
};

pub mod adapter;
pub mod framework;
pub mod surface;

pub use adapter::{
    enumerate_and_select, AdapterError, AdapterHandle, AdapterProperties, AdapterResult,
    AdapterSource,
};
pub use framework::FrameworkConfig;
pub use surface::{SurfaceError, SurfaceResult};

/// Entry point of `wgpu-glue`. Owns the [`wgpu::Instance`] that adapters and
/// surfaces are obtained from; the instance is released when this is dropped.
pub struct Framework {
    instance: wgpu::Instance,
    config: FrameworkConfig,
}

/// Everything the native library needs to create a surface for one window.
///
/// Exactly one backend is populated. The handles are copied out of the window
/// and never dereferenced here; the descriptor owns none of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceDescriptor {
    WaylandSurface(WaylandSurface),
    XcbWindow(XcbWindow),
    XlibWindow(XlibWindow),
    WindowsHwnd(WindowsHwnd),
}

/// `wl_display` / `wl_surface` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaylandSurface {
    pub display: *mut c_void,
    pub surface: *mut c_void,
}

/// `xcb_connection_t` and `xcb_window_t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XcbWindow {
    pub connection: *mut c_void,
    pub window: u32,
}

/// Xlib `Display` and `Window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XlibWindow {
    pub display: *mut c_void,
    pub window: c_ulong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowsHwnd {
    pub hwnd: *mut c_void,
    pub hinstance: *mut c_void,
}
