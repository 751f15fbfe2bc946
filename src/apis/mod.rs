pub mod home;
pub mod dataserver;
pub mod point;
pub mod stream;

// Re-export all APIs
pub use home::HomeApi;
pub use dataserver::DataServerApi;
pub use point::PointApi;
pub use stream::StreamApi;
