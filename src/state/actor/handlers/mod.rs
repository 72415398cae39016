//! Room actor event handlers.

mod broadcast;
mod join;
mod leave;
mod moves;
mod reset;
