use std::{fmt::Debug, io};

use serde::{Serialize, Serializer};
use thiserror::Error;

pub type AdapterResult<T> = Result<T, AdapterError>;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("couldn't find a suitable graphics adapter")]
    NoSuitableAdapter,
    #[error(transparent)]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Read-only description of an adapter, used for display and selection.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct AdapterProperties {
    #[serde(rename = "VendorID")]
    pub vendor_id: u32,
    #[serde(rename = "DeviceID")]
    pub device_id: u32,
    pub name: String,
    pub driver_description: String,
    #[serde(serialize_with = "serialize_debug")]
    pub adapter_type: wgpu::DeviceType,
    #[serde(serialize_with = "serialize_debug")]
    pub backend_type: wgpu::Backend,
}

fn serialize_debug<T: Debug, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{:?}", value))
}

impl AdapterProperties {
    /// Writes the record to `out` as tab-indented JSON, newline terminated.
    pub fn write_pretty<W>(&self, out: &mut W) -> serde_json::Result<()>
    where
        W: io::Write + ?Sized,
    {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut ser = serde_json::Serializer::with_formatter(&mut *out, formatter);
        self.serialize(&mut ser)?;
        out.write_all(b"\n").map_err(serde_json::Error::io)
    }

    pub fn prettify(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        self.write_pretty(&mut buf)?;
        String::from_utf8(buf)
            .map_err(|e| serde_json::Error::io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }
}

fn narrow_id(kind: &str, id: usize) -> u32 {
    u32::try_from(id).unwrap_or_else(|_| {
        log::warn!("{} id {:#x} does not fit in 32 bits", kind, id);
        u32::MAX
    })
}

impl From<wgpu::AdapterInfo> for AdapterProperties {
    fn from(info: wgpu::AdapterInfo) -> Self {
        let driver_description = match (info.driver.is_empty(), info.driver_info.is_empty()) {
            (false, false) => format!("{} {}", info.driver, info.driver_info),
            (false, true) => info.driver,
            _ => info.driver_info,
        };

        Self {
            vendor_id: narrow_id("vendor", info.vendor),
            device_id: narrow_id("device", info.device),
            name: info.name,
            driver_description,
            adapter_type: info.device_type,
            backend_type: info.backend,
        }
    }
}

/// A native adapter handle. Dropping the handle releases the adapter.
pub trait AdapterHandle {
    fn properties(&self) -> AdapterProperties;
}

impl AdapterHandle for wgpu::Adapter {
    fn properties(&self) -> AdapterProperties {
        self.get_info().into()
    }
}

/// Anything that can list the adapters available to it, in native order.
pub trait AdapterSource {
    type Adapter: AdapterHandle;

    fn enumerate_adapters(&self) -> Vec<Self::Adapter>;
}

/// Walks every adapter once, writing `"<index>: <properties>"` to `out`, and
/// keeps the first one. The rest are released as the pass reaches them.
///
/// Returns [`AdapterError::NoSuitableAdapter`] when the source has no
/// adapters. On an early return every adapter not yet handed to the caller is
/// dropped, so none leak.
pub fn enumerate_and_select<S, W>(source: &S, out: &mut W) -> AdapterResult<S::Adapter>
where
    S: AdapterSource + ?Sized,
    W: io::Write + ?Sized,
{
    let adapters = source.enumerate_adapters();
    log::debug!("enumerated {} adapter(s)", adapters.len());

    let mut selected = None;
    for (idx, adapter) in adapters.into_iter().enumerate() {
        let props = adapter.properties();
        write!(out, "{}: ", idx)?;
        props.write_pretty(out)?;

        // placeholder policy: the first adapter wins
        if idx == 0 {
            log::info!("selected adapter {}: {} ({:?})", idx, props.name, props.backend_type);
            selected = Some(adapter);
        } else {
            log::debug!("releasing adapter {}: {}", idx, props.name);
            drop(adapter);
        }
    }

    selected.ok_or(AdapterError::NoSuitableAdapter)
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    #[derive(Debug)]
    struct FakeAdapter {
        props: AdapterProperties,
        released: Rc<RefCell<Vec<String>>>,
    }

    impl AdapterHandle for FakeAdapter {
        fn properties(&self) -> AdapterProperties {
            self.props.clone()
        }
    }

    impl Drop for FakeAdapter {
        fn drop(&mut self) {
            self.released.borrow_mut().push(self.props.name.clone());
        }
    }

    struct FakeInstance {
        names: Vec<&'static str>,
        released: Rc<RefCell<Vec<String>>>,
    }

    impl FakeInstance {
        fn new(names: &[&'static str]) -> Self {
            Self {
                names: names.to_vec(),
                released: Rc::default(),
            }
        }

        fn released(&self) -> Vec<String> {
            self.released.borrow().clone()
        }
    }

    impl AdapterSource for FakeInstance {
        type Adapter = FakeAdapter;

        fn enumerate_adapters(&self) -> Vec<FakeAdapter> {
            self.names
                .iter()
                .enumerate()
                .map(|(i, name)| FakeAdapter {
                    props: props(name, i as u32),
                    released: Rc::clone(&self.released),
                })
                .collect()
        }
    }

    fn props(name: &str, device_id: u32) -> AdapterProperties {
        AdapterProperties {
            vendor_id: 0x10de,
            device_id,
            name: name.to_string(),
            driver_description: String::new(),
            adapter_type: wgpu::DeviceType::DiscreteGpu,
            backend_type: wgpu::Backend::Vulkan,
        }
    }

    /// Fails every write once `budget` bytes have gone through.
    struct ShortWriter {
        budget: usize,
    }

    impl io::Write for ShortWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::new(io::ErrorKind::WriteZero, "out of space"));
            }
            let n = buf.len().min(self.budget);
            self.budget -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn selects_first_and_releases_the_rest() {
        let instance = FakeInstance::new(&["A", "B", "C"]);
        let mut out = Vec::new();

        let selected = enumerate_and_select(&instance, &mut out).unwrap();
        assert_eq!(selected.props.name, "A");
        assert_eq!(instance.released(), vec!["B", "C"]);

        let out = String::from_utf8(out).unwrap();
        let a = out.find("0: {").unwrap();
        let b = out.find("1: {").unwrap();
        let c = out.find("2: {").unwrap();
        assert!(a < b && b < c);
        assert!(out[a..b].contains("\"Name\": \"A\""));
        assert!(out[b..c].contains("\"Name\": \"B\""));
        assert!(out[c..].contains("\"Name\": \"C\""));

        drop(selected);
        assert_eq!(instance.released(), vec!["B", "C", "A"]);
    }

    #[test]
    fn single_adapter_is_returned_unreleased() {
        let instance = FakeInstance::new(&["only"]);
        let selected = enumerate_and_select(&instance, &mut io::sink()).unwrap();
        assert_eq!(selected.props.name, "only");
        assert!(instance.released().is_empty());
    }

    #[test]
    fn empty_sequence_is_no_suitable_adapter() {
        let instance = FakeInstance::new(&[]);
        let mut out = Vec::new();

        let err = enumerate_and_select(&instance, &mut out).unwrap_err();
        assert!(matches!(err, AdapterError::NoSuitableAdapter));
        assert_eq!(err.to_string(), "couldn't find a suitable graphics adapter");
        assert!(out.is_empty());
        assert!(instance.released().is_empty());
    }

    #[test]
    fn write_failure_still_releases_every_adapter() {
        let instance = FakeInstance::new(&["A", "B", "C"]);
        let mut out = ShortWriter { budget: 8 };

        let err = enumerate_and_select(&instance, &mut out).unwrap_err();
        assert!(matches!(err, AdapterError::Json(_)));

        let mut released = instance.released();
        released.sort();
        assert_eq!(released, vec!["A", "B", "C"]);
    }

    #[test]
    fn prettify_uses_tab_indented_json() {
        let text = props("Fake GPU", 0x2204).prettify().unwrap();
        assert_eq!(
            text,
            "{\n\
             \t\"VendorID\": 4318,\n\
             \t\"DeviceID\": 8708,\n\
             \t\"Name\": \"Fake GPU\",\n\
             \t\"DriverDescription\": \"\",\n\
             \t\"AdapterType\": \"DiscreteGpu\",\n\
             \t\"BackendType\": \"Vulkan\"\n\
             }\n"
        );
    }

    #[test]
    fn driver_description_joins_driver_fields() {
        let info = wgpu::AdapterInfo {
            name: "llvmpipe".to_string(),
            vendor: 0x10005,
            device: 0,
            device_type: wgpu::DeviceType::Cpu,
            driver: "llvmpipe".to_string(),
            driver_info: "Mesa 22.3".to_string(),
            backend: wgpu::Backend::Vulkan,
        };

        let props = AdapterProperties::from(info);
        assert_eq!(props.driver_description, "llvmpipe Mesa 22.3");
        assert_eq!(props.vendor_id, 0x10005);
        assert_eq!(props.adapter_type, wgpu::DeviceType::Cpu);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn oversized_ids_saturate_instead_of_wrapping() {
        let info = wgpu::AdapterInfo {
            name: "wide".to_string(),
            vendor: 0x1_0000_10de,
            device: 0x2204,
            device_type: wgpu::DeviceType::Other,
            driver: String::new(),
            driver_info: String::new(),
            backend: wgpu::Backend::Gl,
        };

        let props = AdapterProperties::from(info);
        assert_eq!(props.vendor_id, u32::MAX);
        assert_eq!(props.device_id, 0x2204);
    }

    #[test]
    fn write_pretty_matches_prettify() {
        let props = props("Fake GPU", 1);
        let mut out = Vec::new();
        props.write_pretty(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), props.prettify().unwrap());
    }
}
