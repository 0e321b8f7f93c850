//! Request, response, and stream payload types.

pub mod complete;
pub mod message;
pub mod model;
pub mod stream;
