// Domain layer: grade data, ranking results and the ports the pipeline talks through.

pub mod model;
pub mod numeric;
pub mod ports;
