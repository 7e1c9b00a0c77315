//! The request form: focus engine, form state, request pipeline and the
//! background executor that talks to the network.

pub mod executor;
pub mod field;
pub mod focus;
pub mod form;
pub mod model;
pub mod pipeline;
pub mod transport;
pub mod ui;
