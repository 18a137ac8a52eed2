#[cfg(feature = "ipc")]
pub mod dataframe;
pub mod sink;
