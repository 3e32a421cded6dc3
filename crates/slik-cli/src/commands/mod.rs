pub mod convert;
pub mod layouts;
