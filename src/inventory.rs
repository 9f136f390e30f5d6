use crate::extractor::EndpointEntry;
use log::debug;
use serde::Serialize;

/// The assembled endpoint inventory of one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inventory {
    /// Service name, by default the project directory name
    pub service: String,
    pub base_url: String,
    pub endpoints: Vec<EndpointEntry>,
}

/// Inventory builder
pub struct InventoryBuilder {
    service: String,
    base_url: String,
    endpoints: Vec<EndpointEntry>,
}

impl InventoryBuilder {
    /// Create a builder for `service` with an empty base URL
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            base_url: String::new(),
            endpoints: Vec::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Append endpoints, keeping extraction order
    pub fn add_endpoints(mut self, endpoints: impl IntoIterator<Item = EndpointEntry>) -> Self {
        self.endpoints.extend(endpoints);
        self
    }

    pub fn build(self) -> Inventory {
        debug!(
            "Building inventory for '{}' with {} endpoints",
            self.service,
            self.endpoints.len()
        );
        Inventory {
            service: self.service,
            base_url: self.base_url,
            endpoints: self.endpoints,
        }
    }
}
