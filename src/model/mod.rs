//! Typed descriptions consumed by the generators: datasource columns and
//! pipe parameters.

pub mod column;
pub mod parameter;

pub use column::{Column, Schema};
pub use parameter::{ParamType, Parameter, Parameters};
