use raw_window_handle::{
    HasRawDisplayHandle, HasRawWindowHandle, RawDisplayHandle, RawWindowHandle,
};
use thiserror::Error;

use crate::{SurfaceDescriptor, WaylandSurface, WindowsHwnd, XcbWindow, XlibWindow};

pub type SurfaceResult<T> = Result<T, SurfaceError>;

#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("unsupported window: {window} window handle with {display} display handle")]
    UnsupportedWindow {
        window: &'static str,
        display: &'static str,
    },
    #[error(transparent)]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
}

impl SurfaceDescriptor {
    /// Builds the descriptor for a window, aborting on an unsupported window.
    ///
    /// Use [`SurfaceDescriptor::try_from_window`] to get the error instead.
    pub fn from_window<W>(window: &W) -> Self
    where
        W: HasRawWindowHandle + HasRawDisplayHandle + ?Sized,
    {
        match Self::try_from_window(window) {
            Ok(desc) => desc,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_from_window<W>(window: &W) -> SurfaceResult<Self>
    where
        W: HasRawWindowHandle + HasRawDisplayHandle + ?Sized,
    {
        Self::from_raw_handles(window.raw_window_handle(), window.raw_display_handle())
    }

    /// Picks the one variant matching the handle pair. Which pairs are
    /// accepted depends on the target platform and the `wayland`/`x11`
    /// features.
    pub fn from_raw_handles(
        window: RawWindowHandle,
        display: RawDisplayHandle,
    ) -> SurfaceResult<Self> {
        let desc: SurfaceDescriptor = match (window, display) {
            #[cfg(all(
                feature = "wayland",
                unix,
                not(any(target_os = "macos", target_os = "ios", target_os = "android"))
            ))]
            (RawWindowHandle::Wayland(w), RawDisplayHandle::Wayland(d)) => {
                SurfaceDescriptor::WaylandSurface(WaylandSurface {
                    display: d.display,
                    surface: w.surface,
                })
            }
            #[cfg(all(
                feature = "x11",
                unix,
                not(any(target_os = "macos", target_os = "ios", target_os = "android"))
            ))]
            (RawWindowHandle::Xcb(w), RawDisplayHandle::Xcb(d)) => {
                SurfaceDescriptor::XcbWindow(XcbWindow {
                    connection: d.connection,
                    window: w.window,
                })
            }
            #[cfg(all(
                feature = "x11",
                unix,
                not(any(target_os = "macos", target_os = "ios", target_os = "android"))
            ))]
            (RawWindowHandle::Xlib(w), RawDisplayHandle::Xlib(d)) => {
                SurfaceDescriptor::XlibWindow(XlibWindow {
                    display: d.display,
                    window: w.window,
                })
            }
            #[cfg(windows)]
            (RawWindowHandle::Win32(w), RawDisplayHandle::Windows(_)) => {
                SurfaceDescriptor::WindowsHwnd(WindowsHwnd {
                    hwnd: w.hwnd,
                    hinstance: w.hinstance,
                })
            }
            (window, display) => {
                return Err(SurfaceError::UnsupportedWindow {
                    window: window_kind(&window),
                    display: display_kind(&display),
                })
            }
        };

        log::debug!("selected {} surface descriptor", desc.kind());
        Ok(desc)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SurfaceDescriptor::WaylandSurface(_) => "Wayland",
            SurfaceDescriptor::XcbWindow(_) => "Xcb",
            SurfaceDescriptor::XlibWindow(_) => "Xlib",
            SurfaceDescriptor::WindowsHwnd(_) => "Win32",
        }
    }
}

fn window_kind(handle: &RawWindowHandle) -> &'static str {
    match handle {
        RawWindowHandle::Wayland(_) => "Wayland",
        RawWindowHandle::Xcb(_) => "Xcb",
        RawWindowHandle::Xlib(_) => "Xlib",
        RawWindowHandle::Win32(_) => "Win32",
        RawWindowHandle::WinRt(_) => "WinRt",
        RawWindowHandle::AppKit(_) => "AppKit",
        RawWindowHandle::UiKit(_) => "UiKit",
        RawWindowHandle::AndroidNdk(_) => "AndroidNdk",
        RawWindowHandle::Web(_) => "Web",
        _ => "unknown",
    }
}

fn display_kind(handle: &RawDisplayHandle) -> &'static str {
    match handle {
        RawDisplayHandle::Wayland(_) => "Wayland",
        RawDisplayHandle::Xcb(_) => "Xcb",
        RawDisplayHandle::Xlib(_) => "Xlib",
        RawDisplayHandle::Windows(_) => "Windows",
        RawDisplayHandle::AppKit(_) => "AppKit",
        RawDisplayHandle::UiKit(_) => "UiKit",
        RawDisplayHandle::Android(_) => "Android",
        RawDisplayHandle::Web(_) => "Web",
        _ => "unknown",
    }
}

// The descriptor hands its handles back out in raw-window-handle form so it
// can go straight into `wgpu::Instance::create_surface`.
unsafe impl HasRawWindowHandle for SurfaceDescriptor {
    fn raw_window_handle(&self) -> RawWindowHandle {
        match *self {
            SurfaceDescriptor::WaylandSurface(WaylandSurface { surface, .. }) => {
                let mut handle = raw_window_handle::WaylandWindowHandle::empty();
                handle.surface = surface;
                RawWindowHandle::Wayland(handle)
            }
            SurfaceDescriptor::XcbWindow(XcbWindow { window, .. }) => {
                let mut handle = raw_window_handle::XcbWindowHandle::empty();
                handle.window = window;
                RawWindowHandle::Xcb(handle)
            }
            SurfaceDescriptor::XlibWindow(XlibWindow { window, .. }) => {
                let mut handle = raw_window_handle::XlibWindowHandle::empty();
                handle.window = window;
                RawWindowHandle::Xlib(handle)
            }
            SurfaceDescriptor::WindowsHwnd(WindowsHwnd { hwnd, hinstance }) => {
                let mut handle = raw_window_handle::Win32WindowHandle::empty();
                handle.hwnd = hwnd;
                handle.hinstance = hinstance;
                RawWindowHandle::Win32(handle)
            }
        }
    }
}

unsafe impl HasRawDisplayHandle for SurfaceDescriptor {
    fn raw_display_handle(&self) -> RawDisplayHandle {
        match *self {
            SurfaceDescriptor::WaylandSurface(WaylandSurface { display, .. }) => {
                let mut handle = raw_window_handle::WaylandDisplayHandle::empty();
                handle.display = display;
                RawDisplayHandle::Wayland(handle)
            }
            SurfaceDescriptor::XcbWindow(XcbWindow { connection, .. }) => {
                let mut handle = raw_window_handle::XcbDisplayHandle::empty();
                handle.connection = connection;
                RawDisplayHandle::Xcb(handle)
            }
            SurfaceDescriptor::XlibWindow(XlibWindow { display, .. }) => {
                let mut handle = raw_window_handle::XlibDisplayHandle::empty();
                handle.display = display;
                RawDisplayHandle::Xlib(handle)
            }
            SurfaceDescriptor::WindowsHwnd(_) => {
                RawDisplayHandle::Windows(raw_window_handle::WindowsDisplayHandle::empty())
            }
        }
    }
}
