// Declare model modules
pub mod layouts;
