use anyhow::Result;
use log::debug;

use logger_demo_server::{
    config::Config,
    logging::{self, Console, Logger, Sinks},
    middleware,
    router::Router,
    routes,
    web_server::WebServer,
};

fn main() -> Result<()> {
    let config = Config::from_env();
    let sinks = Sinks::open(&config)?;
    let logger = Logger::new(&config, &sinks);

    logging::bridge::install(Console::new(logger.clone()))?;
    debug!("configuration: {}", serde_json::to_string(&config)?);

    let router = Router::new()
        .before(middleware::log_request)
        .on_error(middleware::handle_error)
        .get("/loggerTest", routes::get_logger_test)?;

    let server = WebServer::bind(&config, router, logger)?;
    server.run()
}
