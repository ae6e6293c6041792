// Domain layer: core models and ports (provider interfaces).

pub mod model;
pub mod ports;
