//! Device-characteristics discovery: a short linear pipeline of inquiry,
//! VPD, passthrough-identify, and read-capacity probes that fills a
//! [`DeviceInfo`] record and classifies the bridge the device sits behind.
//!
//! Discovery is best-effort. Apart from the initial inquiry every probe
//! degrades to plain-SCSI classification when it fails; the pipeline never
//! retries and never aborts on an advanced probe going wrong.

mod fill;
mod info;

pub mod quirks;

pub use fill::{fill_device_info, DiscoverError};
pub use info::{DeviceClass, DeviceInfo, InterfaceKind};
pub use quirks::{match_bridge, QuirkEntry, Quirks};
