pub mod alignment;
pub mod timing;
pub mod trigger;
