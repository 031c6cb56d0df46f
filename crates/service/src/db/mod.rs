pub mod category_service;
pub mod house_service;
