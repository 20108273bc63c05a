// Domain layer: records, ports and the pure feed/admin rules around them.

pub mod draft;
pub mod feed;
pub mod model;
pub mod ports;
pub mod views;
