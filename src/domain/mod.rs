// Domain layer: service descriptors, HTTP contract types and ports (interfaces).

pub mod model;
pub mod ports;
pub mod templates;
