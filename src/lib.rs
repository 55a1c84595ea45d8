pub mod config;
pub mod http;
pub mod logging;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod thread_pool;
pub mod web_server;
