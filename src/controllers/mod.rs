pub mod driver_controller;
pub mod vehicle_controller;

pub use driver_controller::DriverController;
pub use vehicle_controller::VehicleController;
