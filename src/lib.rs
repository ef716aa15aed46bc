pub mod engine;
pub mod form;
pub mod limits;
pub mod model;
pub mod observability;
pub mod seed;
pub mod service;
pub mod session;
