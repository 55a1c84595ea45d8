use anyhow::{Context, Result};
use log::{error, trace};
use std::{
    io::{self, Write},
    net::{SocketAddr, TcpListener, TcpStream},
    sync::Arc,
    time::Duration,
};

use crate::{
    config::Config,
    http::{HttpRequest, HttpRequestRaw, HttpResponse, HttpResponseBuilder, HttpStatusCode},
    logging::Logger,
    router::Router,
    thread_pool::ThreadPool,
};

pub struct WebServer {
    pub address: SocketAddr,
    router: Arc<Router>,
    logger: Logger,
    read_timeout: Duration,
    listener: TcpListener,
    pool: ThreadPool,
}

impl WebServer {
    /// Binds the listener and announces the port once it is ready.
    pub fn bind(config: &Config, router: Router, logger: Logger) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_address)
            .with_context(|| format!("failed to bind {}", config.listen_address))?;
        let address = listener.local_addr()?;
        let pool = ThreadPool::new(config.workers)?;

        logger.info(&format!("Servidor iniciado en el puerto {}", address.port()));

        Ok(WebServer {
            address,
            router: Arc::new(router),
            logger,
            read_timeout: config.read_timeout,
            listener,
            pool,
        })
    }

    pub fn run(&self) -> Result<()> {
        trace!("awaiting connections on {}", self.address);

        for stream in self.listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    error!("failed to accept connection: {}", e);
                    continue;
                }
            };
            trace!("got new tcp connection!");

            if let Err(e) = stream.set_read_timeout(Some(self.read_timeout)) {
                error!("failed to set read timeout: {}", e);
                continue;
            }

            let router = Arc::clone(&self.router);
            let logger = self.logger.clone();
            self.pool.execute(move || {
                if let Err(e) = handle_connection(&router, &logger, stream) {
                    error!("error: {:#}", e);
                }
            })?;
        }

        Ok(())
    }
}

fn handle_connection(router: &Router, logger: &Logger, mut stream: TcpStream) -> Result<()> {
    let raw_request = match HttpRequestRaw::from_tcp(&stream) {
        Ok(raw_request) => raw_request,
        Err(e) if is_timeout(&e) => {
            trace!("connection timed out before sending a full request");
            return Ok(());
        }
        Err(e) => return reply_bad_request(stream, e),
    };

    if raw_request.request_line.trim().is_empty() {
        trace!("connection closed without sending a request");
        return Ok(());
    }

    let request = match HttpRequest::from_raw_request(raw_request) {
        Ok(request) => request,
        Err(e) => return reply_bad_request(stream, e),
    };
    trace!(
        "{} {} {}",
        request.method,
        request.resource_path,
        request.version
    );

    let mut response = router.handle_request(&request, logger);
    response.version = request.version;

    write_response(&mut stream, &response)
}

fn is_timeout(e: &anyhow::Error) -> bool {
    e.downcast_ref::<io::Error>().is_some_and(|e| {
        matches!(
            e.kind(),
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
        )
    })
}

fn reply_bad_request(mut stream: TcpStream, e: anyhow::Error) -> Result<()> {
    error!("malformed request: {:#}", e);

    let response = HttpResponseBuilder::new()
        .set_status(HttpStatusCode::BadRequest)
        .build();
    write_response(&mut stream, &response)
}

fn write_response(stream: &mut TcpStream, response: &HttpResponse) -> Result<()> {
    stream.write_all(&response.to_bytes())?;
    stream.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::bail;
    use std::{io::Read, thread};

    use super::*;
    use crate::config::Mode;
    use crate::logging::logger::tests::memory_logger;
    use crate::logging::Level;
    use crate::{middleware, routes};

    fn failing_callback(_request: &HttpRequest, _logger: &Logger) -> Result<HttpResponse> {
        bail!("downstream exploded")
    }

    fn test_config() -> Config {
        let mut config = Config::new(Mode::Development);
        config.listen_address = "127.0.0.1:0".to_owned();
        config.workers = 2;
        config.read_timeout = Duration::from_millis(200);
        config
    }

    fn send(address: SocketAddr, raw: &str) -> String {
        let mut stream = TcpStream::connect(address).unwrap();
        stream.write_all(raw.as_bytes()).unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    fn start(router: Router, logger: Logger) -> SocketAddr {
        start_with(test_config(), router, logger)
    }

    fn start_with(config: Config, router: Router, logger: Logger) -> SocketAddr {
        let server = WebServer::bind(&config, router, logger).unwrap();
        let address = server.address;
        thread::spawn(move || server.run());
        address
    }

    #[test]
    fn test_logger_test_end_to_end() {
        let (logger, sink) = memory_logger(Level::Debug);
        let router = Router::new()
            .before(middleware::log_request)
            .get("/loggerTest", routes::get_logger_test)
            .unwrap();
        let address = start(router, logger);

        let response = send(address, "GET /loggerTest HTTP/1.1\r\nHost: localhost\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.ends_with("\r\n\r\nLogs generados en la consola"));

        let records = sink.records();
        assert_eq!(
            (
                Level::Info,
                format!("Servidor iniciado en el puerto {}", address.port())
            ),
            records[0]
        );
        assert_eq!((Level::Http, "GET /loggerTest".to_owned()), records[1]);
        assert_eq!(8, records.len());
    }

    #[test]
    fn test_failing_handler_end_to_end() {
        let (logger, sink) = memory_logger(Level::Info);
        let router = Router::new()
            .before(middleware::log_request)
            .get("/fail", failing_callback)
            .unwrap();
        let address = start(router, logger);

        let response = send(address, "GET /fail HTTP/1.0\r\n\r\n");

        assert!(response.starts_with("HTTP/1.0 500 Internal Server Error\r\n"));
        assert!(response.ends_with("Error interno del servidor"));

        let errors: Vec<(Level, String)> = sink
            .records()
            .into_iter()
            .filter(|(level, _)| *level == Level::Error)
            .collect();
        assert_eq!(1, errors.len());
        assert!(errors[0].1.contains("downstream exploded"));
    }

    #[test]
    fn test_malformed_request_bad_request() {
        let (logger, _) = memory_logger(Level::Debug);
        let address = start(Router::new(), logger);

        let response = send(address, "HELLO\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }

    fn logger_test_router() -> Router {
        Router::new()
            .get("/loggerTest", routes::get_logger_test)
            .unwrap()
    }

    #[test]
    fn test_huge_content_length_bad_request_and_server_survives() {
        let (logger, _) = memory_logger(Level::Debug);
        let mut config = test_config();
        config.workers = 1;
        let address = start_with(config, logger_test_router(), logger);

        for _ in 0..2 {
            let response = send(
                address,
                "POST /loggerTest HTTP/1.1\r\nContent-Length: 18446744073709551615\r\n\r\n",
            );
            assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        }

        let response = send(address, "GET /loggerTest HTTP/1.1\r\n\r\n");
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    }

    #[test]
    fn test_silent_client_does_not_block_worker() {
        let (logger, _) = memory_logger(Level::Debug);
        let mut config = test_config();
        config.workers = 1;
        let address = start_with(config, logger_test_router(), logger);

        let mut silent = TcpStream::connect(address).unwrap();
        silent.write_all(b"GET /loggerTest HTTP/1.1\r\n").unwrap();
        thread::sleep(Duration::from_millis(50));

        let response = send(address, "GET /loggerTest HTTP/1.1\r\n\r\n");
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));

        let mut leftover = String::new();
        silent.read_to_string(&mut leftover).unwrap();
        assert!(leftover.is_empty());
    }

    #[test]
    fn test_bind_failure_err() {
        let (logger, sink) = memory_logger(Level::Debug);
        let mut config = test_config();
        config.listen_address = "not an address".to_owned();

        assert!(WebServer::bind(&config, Router::new(), logger).is_err());
        assert!(sink.records().is_empty());
    }
}
