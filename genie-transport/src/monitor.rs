//! Monitoring middleware for device calls
//!
//! Wraps any [`Device`] and reports every call and its result before handing
//! the result back unchanged.
//!
//! ```ignore
//! use genie_transport::{MonitorConfig, MonitorDevice};
//!
//! let device = discovery.open_device(&serial).await?;
//! let monitored = MonitorDevice::wrap(device, MonitorConfig::default());
//! ```

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use crossterm::style::Stylize;
use tracing::info;

use crate::device::Device;
use crate::error::DeviceError;
use crate::types::{DeviceType, MatrixDimensions, RgbColor};

/// Where monitor lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorSink {
    /// Colored lines on stderr
    #[default]
    Stderr,
    /// `tracing` events under the `monitor` target
    Log,
}

/// Configuration for [`MonitorDevice`]
#[derive(Debug, Clone, Default)]
pub struct MonitorConfig {
    pub sink: MonitorSink,
    /// Print every color of a row definition, not just the span
    pub show_colors: bool,
}

impl MonitorConfig {
    pub fn with_sink(mut self, sink: MonitorSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_colors(mut self, show: bool) -> Self {
        self.show_colors = show;
        self
    }
}

/// Device middleware that reports all calls passing through it
pub struct MonitorDevice {
    inner: Arc<dyn Device>,
    config: MonitorConfig,
}

impl MonitorDevice {
    /// Wrap a device with monitoring
    pub fn wrap(device: Arc<dyn Device>, config: MonitorConfig) -> Arc<dyn Device> {
        Arc::new(Self {
            inner: device,
            config,
        })
    }

    fn report<T>(&self, call: &str, started: Instant, result: &Result<T, DeviceError>) {
        let elapsed = started.elapsed().as_micros();
        let serial = self.inner.serial();
        match self.config.sink {
            MonitorSink::Log => match result {
                Ok(_) => info!(target: "monitor", "{serial} {call} ok ({elapsed}us)"),
                Err(e) => info!(target: "monitor", "{serial} {call} FAILED: {e} ({elapsed}us)"),
            },
            MonitorSink::Stderr => {
                let status = match result {
                    Ok(_) => "ok".green().to_string(),
                    Err(e) => format!("FAILED: {e}").red().to_string(),
                };
                eprintln!(
                    "{} {} {} {}",
                    format!("[{serial}]").dark_grey(),
                    call.cyan(),
                    status,
                    format!("({elapsed}us)").dark_grey()
                );
            }
        }
    }
}

impl MonitorConfig {
    fn describe_define(
        &self,
        row: usize,
        col_start: usize,
        col_end: usize,
        colors: &[RgbColor],
    ) -> String {
        let call = format!("define_custom_frame row={row} cols={col_start}..={col_end}");
        if self.show_colors {
            format!("{call} [{}]", format_colors(colors))
        } else {
            call
        }
    }
}

fn format_colors(colors: &[RgbColor]) -> String {
    colors
        .iter()
        .map(RgbColor::to_hex)
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl Device for MonitorDevice {
    fn serial(&self) -> &str {
        self.inner.serial()
    }

    async fn name(&self) -> Result<String, DeviceError> {
        let started = Instant::now();
        let result = self.inner.name().await;
        self.report("name", started, &result);
        result
    }

    async fn device_type(&self) -> Result<DeviceType, DeviceError> {
        let started = Instant::now();
        let result = self.inner.device_type().await;
        self.report("device_type", started, &result);
        result
    }

    async fn matrix_dimensions(&self) -> Result<MatrixDimensions, DeviceError> {
        let started = Instant::now();
        let result = self.inner.matrix_dimensions().await;
        self.report("matrix_dimensions", started, &result);
        result
    }

    async fn keyboard_layout(&self) -> Result<String, DeviceError> {
        let started = Instant::now();
        let result = self.inner.keyboard_layout().await;
        self.report("keyboard_layout", started, &result);
        result
    }

    async fn define_custom_frame(
        &self,
        row: usize,
        col_start: usize,
        col_end: usize,
        colors: &[RgbColor],
    ) -> Result<(), DeviceError> {
        let started = Instant::now();
        let result = self
            .inner
            .define_custom_frame(row, col_start, col_end, colors)
            .await;
        let call = self.config.describe_define(row, col_start, col_end, colors);
        self.report(&call, started, &result);
        result
    }

    async fn display_custom_frame(&self) -> Result<(), DeviceError> {
        let started = Instant::now();
        let result = self.inner.display_custom_frame().await;
        self.report("display_custom_frame", started, &result);
        result
    }
}
