//! Dry-run gateway: reads for real, writes nothing.
//!
//! Wraps another gateway.  Report queries are forwarded unchanged so detection
//! sees the live topology; property writes are logged at `info` level and
//! recorded as the plan that would have been applied.

use std::sync::Mutex;

use tracing::info;

use crate::application::gateway::{CommandGateway, DeviceProperty, GatewayError, ReportQuery};

/// A gateway that forwards queries to `G` and swallows property writes.
#[derive(Debug)]
pub struct DryRunGateway<G> {
    inner: G,
    planned: Mutex<Vec<(u32, DeviceProperty)>>,
}

impl<G: CommandGateway> DryRunGateway<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            planned: Mutex::new(Vec::new()),
        }
    }

    /// Returns the writes that were skipped, in order.
    pub fn planned(&self) -> Vec<(u32, DeviceProperty)> {
        self.planned
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl<G: CommandGateway> CommandGateway for DryRunGateway<G> {
    fn query(&self, query: ReportQuery) -> Result<String, GatewayError> {
        self.inner.query(query)
    }

    fn apply_device_property(
        &self,
        device_id: u32,
        property: &DeviceProperty,
    ) -> Result<(), GatewayError> {
        info!(
            device_id,
            property = property.name(),
            value = %property.value(),
            "dry run: skipping property write"
        );
        if let Ok(mut planned) = self.planned.lock() {
            planned.push((device_id, property.clone()));
        }
        Ok(())
    }
}
