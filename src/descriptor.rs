//! Descriptor payloads produced by the pipeline stages.
//!
//! Descriptors are plain data: displayable fields for picking a variant,
//! plus the upstream-internal download route that the direct-link stage
//! consumes. They stay valid for as long as the upstream honors the route,
//! independent of the call that produced them.

use std::fmt;

use serde::Serialize;

/// A download variant discovered on the source page, before any playable
/// URL has been resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDescriptor {
    /// Quality label as the upstream displays it, e.g. `"Original quality"`.
    pub quality: String,
    /// Resolution label, e.g. `"720p"`.
    pub resolution: String,
    /// Approximate file size in bytes; `0` when the upstream reports none.
    pub size_bytes: u64,
    #[serde(skip_serializing)]
    route_url: String,
}

impl RouteDescriptor {
    #[must_use]
    pub fn new(
        quality: impl Into<String>,
        resolution: impl Into<String>,
        size_bytes: u64,
        route_url: impl Into<String>,
    ) -> Self {
        Self {
            quality: quality.into(),
            resolution: resolution.into(),
            size_bytes,
            route_url: route_url.into(),
        }
    }
}

impl fmt::Display for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.quality)
    }
}

/// A stream variant with its playable URL attached.
///
/// Outside skip mode the URL points at the variant's playlist; in skip mode
/// it falls back to the route's own link, so it is never empty either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamDescriptor {
    /// Resolution label, e.g. `"720p"`.
    pub resolution: String,
    /// Playable URL for this variant.
    pub url: String,
    /// Approximate file size in bytes; `0` when the upstream reports none.
    pub size_bytes: u64,
    #[serde(skip_serializing)]
    route_url: String,
}

impl StreamDescriptor {
    /// Skip-mode construction: the route's own link stands in for the
    /// playable URL.
    pub(crate) fn from_route(route: RouteDescriptor) -> Self {
        Self {
            resolution: route.resolution,
            url: route.route_url.clone(),
            size_bytes: route.size_bytes,
            route_url: route.route_url,
        }
    }

    /// Pair a discovered route with its freshly resolved playable URL.
    pub(crate) fn resolved(route: RouteDescriptor, url: String) -> Self {
        Self {
            resolution: route.resolution,
            url,
            size_bytes: route.size_bytes,
            route_url: route.route_url,
        }
    }
}

impl fmt::Display for StreamDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolution)
    }
}

/// The final, directly fetchable download URL for one variant.
///
/// Typically token-bearing and short-lived; fetch it promptly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectLink {
    pub url: String,
}

impl fmt::Display for DirectLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Either descriptor kind, as accepted by the direct-link stage.
pub trait Descriptor: Send + Sync {
    /// The upstream-internal download route backing this descriptor.
    fn route_url(&self) -> &str;

    /// Short label for traces and log lines.
    fn label(&self) -> &str;
}

impl Descriptor for RouteDescriptor {
    fn route_url(&self) -> &str {
        &self.route_url
    }

    fn label(&self) -> &str {
        &self.quality
    }
}

impl Descriptor for StreamDescriptor {
    fn route_url(&self) -> &str {
        &self.route_url
    }

    fn label(&self) -> &str {
        &self.resolution
    }
}
