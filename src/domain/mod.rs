// Domain layer: statement data model and the ports to the feed and renderer.

pub mod model;
pub mod ports;
