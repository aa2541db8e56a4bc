//! Route incoming requests to the relevant handler.
use std::sync::Arc;

use guestbook_http::allowed_methods::{MethodAllowList, method_not_allowed};
use guestbook_http::response::{self, Response};
use guestbook_http::server::{Server, ServerHandle};
use http::{Method, StatusCode};
use tracing::Instrument;
use uuid::Uuid;

use crate::routes;
use crate::state::{ApplicationState, ApplicationStateError};
use crate::telemetry::{self, fields::HTTP_ROUTE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Guestbook,
    Ping,
}

impl Route {
    const ALL: [Route; 2] = [Route::Guestbook, Route::Ping];

    fn path_pattern(self) -> &'static str {
        match self {
            Route::Guestbook => "/",
            Route::Ping => "/api/ping",
        }
    }

    fn allowed_methods(self) -> MethodAllowList {
        match self {
            Route::Guestbook | Route::Ping => MethodAllowList::from_iter([Method::GET]),
        }
    }
}

/// The state shared by every request: the router and the application state.
pub struct ServerState {
    router: matchit::Router<Route>,
    pub application_state: ApplicationState,
}

impl ServerState {
    pub fn new(application_state: ApplicationState) -> Result<Self, ApplicationStateError> {
        let mut router = matchit::Router::new();
        for route in Route::ALL {
            router.insert(route.path_pattern(), route)?;
        }
        Ok(Self {
            router,
            application_state,
        })
    }
}

/// Start serving the guestbook on the addresses `server` is listening on.
pub fn run(server: Server, server_state: ServerState) -> ServerHandle {
    server.serve(route_request::<hyper::body::Incoming>, Arc::new(server_state))
}

/// Dispatch an incoming request to the relevant handler.
///
/// Requests on unknown paths get a `404 Not Found`.
/// Requests on known paths with an unsupported method get a `405 Method Not Allowed`.
pub async fn route_request<B>(
    request: http::Request<B>,
    server_state: Arc<ServerState>,
) -> Response
where
    B: Send,
{
    // The body is not used by any route.
    let (request_head, _) = request.into_parts();
    let root_span = telemetry::root_span(&request_head, Uuid::now_v7());
    let span = root_span.inner().clone();

    async move {
        let route = server_state
            .router
            .at(request_head.uri.path())
            .ok()
            .map(|matched| *matched.value);
        let response = match route {
            None => response::empty(StatusCode::NOT_FOUND),
            Some(route) => {
                root_span.record(HTTP_ROUTE, route.path_pattern());
                let allowed_methods = route.allowed_methods();
                if !allowed_methods.allows(&request_head.method) {
                    method_not_allowed(&allowed_methods)
                } else {
                    match route {
                        Route::Ping => routes::ping::get(),
                        Route::Guestbook => {
                            let state = &server_state.application_state;
                            match routes::guestbook::get(request_head.uri.query(), state).await {
                                Ok(response) => response,
                                Err(e) => {
                                    telemetry::error_logger(&e, &root_span);
                                    e.into_response()
                                }
                            }
                        }
                    }
                }
            }
        };
        telemetry::response_logger(&response, &root_span);
        response
    }
    .instrument(span)
    .await
}
