//! k8s-image
//! ==========
//!
//! Relay container images of gcr.io, k8s.gcr.io, registry.k8s.io, ghcr.io,
//! quay.io and Docker Hub to a private registry.
//! Registries unreachable from the network are pulled through a Docker Hub mirror.

pub mod config;
pub mod engine;
pub mod error;
pub mod relay;
pub mod rewrite;

mod image_uri;

pub use image_uri::ImageUri;
