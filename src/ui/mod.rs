//! Presentation layer — screen state machine, controller and terminal front end.

pub mod cli;
pub mod controller;
pub mod screen;
pub mod view;

pub use controller::Controller;
pub use screen::{Action, Screen};
pub use view::{Renderer, View};
