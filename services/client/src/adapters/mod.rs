pub mod gateway;
pub mod session;

pub use gateway::HttpGateway;
pub use session::FileSessionStore;
