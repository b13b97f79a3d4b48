//! Business logic services for the Gestionale platform

pub mod auth;
pub mod employee;
pub mod fleet;
pub mod inventory;
pub mod notification;
pub mod order;
pub mod product;
pub mod receipt;
pub mod registry;
pub mod reporting;

pub use auth::AuthService;
pub use employee::EmployeeService;
pub use fleet::FleetService;
pub use inventory::InventoryService;
pub use notification::NotificationService;
pub use order::OrderService;
pub use product::ProductService;
pub use receipt::ReceiptService;
pub use registry::RegistryService;
pub use reporting::ReportingService;
