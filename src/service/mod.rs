//! Services, the billable offerings of a profile.

mod db;
mod domain;
mod list;

pub use db::{create_service, create_service_table, get_services};
pub use domain::{NewService, Service, ServiceId, ServiceWithProfile};
pub(crate) use list::get_services_page;
