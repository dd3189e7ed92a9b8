//! Browser infrastructure: locating, launching, and wrapping Chrome instances

mod setup;
mod wrapper;

pub use setup::{download_managed_browser, find_browser_executable};

pub(crate) use setup::launch_browser;
pub(crate) use wrapper::BrowserWrapper;
