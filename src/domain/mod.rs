// Domain layer: booking models, the clock-time window and the ports the core drives.

pub mod model;
pub mod ports;
pub mod time_window;
