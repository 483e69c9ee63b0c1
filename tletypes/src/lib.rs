extern crate nalgebra as na;

pub mod observer;
pub mod position;
pub mod prelude;
pub mod time;
pub mod tle;
