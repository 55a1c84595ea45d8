use anyhow::{anyhow, Result};
use log::trace;
use std::{
    any::Any,
    collections::HashMap,
    panic::{self, AssertUnwindSafe},
};

use crate::{
    http::{HttpMethod, HttpRequest, HttpResponse, HttpResponseBuilder, HttpStatusCode},
    logging::Logger,
    middleware,
};

pub type RoutingCallback = fn(&HttpRequest, &Logger) -> Result<HttpResponse>;

/// Runs before routing. Cannot answer the request itself, so the chain
/// always continues.
pub type BeforeHook = fn(&HttpRequest, &Logger);

/// Turns a failed handler into a response.
pub type ErrorHandler = fn(&anyhow::Error, &HttpRequest, &Logger) -> HttpResponse;

pub struct Router {
    routes: HashMap<Route, RoutingCallback>,
    hooks: Vec<BeforeHook>,
    error_handler: ErrorHandler,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Router {
            routes: HashMap::new(),
            hooks: Vec::new(),
            error_handler: middleware::handle_error,
        }
    }

    pub fn handle_request(&self, request: &HttpRequest, logger: &Logger) -> HttpResponse {
        for hook in &self.hooks {
            hook(request, logger);
        }

        let route = Route::new(request.method, &request.url);
        trace!("route: {:?}", route);

        let Some(callback) = self.routes.get(&route) else {
            return not_found(request);
        };

        match panic::catch_unwind(AssertUnwindSafe(|| callback(request, logger))) {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => (self.error_handler)(&e, request, logger),
            Err(payload) => {
                let e = anyhow!("handler panicked: {}", panic_message(payload.as_ref()));
                (self.error_handler)(&e, request, logger)
            }
        }
    }

    pub fn add_route(
        &mut self,
        method: HttpMethod,
        path: &str,
        callback: RoutingCallback,
    ) -> Result<()> {
        let route = Route::new(method, path);

        if self.routes.contains_key(&route) {
            return Err(anyhow!(
                "cannot register route {:?} because a similar route already exists",
                route
            ));
        }

        self.routes.insert(route, callback);
        Ok(())
    }

    pub fn get(mut self, path: &str, callback: RoutingCallback) -> Result<Self> {
        self.add_route(HttpMethod::GET, path, callback)?;
        Ok(self)
    }

    pub fn before(mut self, hook: BeforeHook) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn on_error(mut self, handler: ErrorHandler) -> Self {
        self.error_handler = handler;
        self
    }
}

/// Paths match regardless of case and of a trailing slash.
#[derive(Debug, Hash, Eq, PartialEq, Clone)]
pub struct Route {
    pub method: HttpMethod,
    pub path: String,
}

impl Route {
    pub fn new(method: HttpMethod, path: &str) -> Self {
        let path = path.to_lowercase();
        let path = if path.ends_with('/') {
            path
        } else {
            format!("{}/", path)
        };

        Route { method, path }
    }
}

fn not_found(request: &HttpRequest) -> HttpResponse {
    HttpResponseBuilder::new()
        .set_status(HttpStatusCode::NotFound)
        .set_html_body(&format!("Cannot {} {}", request.method, request.url))
        .build()
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic payload"
    }
}
