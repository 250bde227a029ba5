pub mod middleware;
pub mod response;
