// HTTP API controllers for the supervisor command surface.

pub mod command;
pub mod controller;


pub use command::CommandController;
pub use controller::Controller;
