pub mod notifier;
pub mod pricing;
pub mod recorder;
pub mod reservation;
pub mod seats;
