pub mod agent;
pub mod gateway;
