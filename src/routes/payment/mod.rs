mod handler;
mod model;

pub use handler::{pay, payment_link};
