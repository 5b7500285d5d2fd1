pub mod model;
pub mod repository;

pub use model::{NewServiceOffering, ServiceOffering};
pub use repository::ServiceRepository;
