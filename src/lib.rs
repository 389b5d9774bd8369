pub mod config;
pub mod error;
pub mod features;
pub mod indicator;
pub mod io;
pub mod live;
pub mod logging;
pub mod model;
pub mod notify;
pub mod scorer;
pub mod session;
pub mod strategy;
