// Domain layer: catalog data, enrichment models and the provider ports.

pub mod catalog;
pub mod model;
pub mod ports;
