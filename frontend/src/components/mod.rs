pub mod assistant;
pub mod toast;
