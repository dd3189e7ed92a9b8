pub mod constants;
pub mod timeout;
pub mod wait;

pub use timeout::{validate_interaction_timeout, validate_navigation_timeout};
pub use wait::{ElementState, wait_for_element, wait_for_element_state};
