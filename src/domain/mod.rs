// Domain layer: the host set, ordering rules and the ports the pipeline is built on.

pub mod model;
pub mod ordering;
pub mod ports;
