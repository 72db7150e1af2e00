use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::Method;
use axum::routing::{get, MethodRouter};
use axum::Router;
use tower_http::trace::TraceLayer;

use cddemo_types::ResourceKind;

use crate::handler::{self, AppState, Params};
use crate::schema::{UrlMethods, UrlScope};

pub mod endpoints {
    pub const HEALTH: &str = "/v1/health";
    pub const INFO: &str = "/v1/info";
}

/// Build the axum router: fixed service endpoints plus every URL the
/// schema registry declares, each accepting exactly its declared methods.
pub fn build_router(state: AppState) -> Router {
    let mut router: Router<AppState> = Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(
            endpoints::INFO,
            get(|State(state): State<AppState>| handler::info_handler(state)),
        );

    for url in state.schemas.url_methods() {
        router = router.route(&url.template, method_route(&url));
    }

    router
        .fallback(handler::unknown_resource_type)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Top-level collections have no path parameters at all.
fn path_params(params: Option<Path<Params>>) -> Params {
    params.map(|Path(p)| p).unwrap_or_default()
}

fn method_route(url: &UrlMethods) -> MethodRouter<AppState> {
    let mut route: MethodRouter<AppState> =
        MethodRouter::new().fallback(handler::method_not_allowed);
    for method in &url.methods {
        route = match url.scope {
            UrlScope::Collection => collection_method(route, url.kind, method),
            UrlScope::Resource => resource_method(route, url.kind, method),
        };
    }
    route
}

fn collection_method(
    route: MethodRouter<AppState>,
    kind: ResourceKind,
    method: &Method,
) -> MethodRouter<AppState> {
    if *method == Method::GET {
        route.get(
            move |State(state): State<AppState>, params: Option<Path<Params>>| {
                handler::list(state, kind, path_params(params))
            },
        )
    } else if *method == Method::POST {
        route.post(
            move |State(state): State<AppState>, params: Option<Path<Params>>, body: Bytes| {
                handler::create(state, kind, path_params(params), body)
            },
        )
    } else {
        unsupported(kind, method);
        route
    }
}

fn resource_method(
    route: MethodRouter<AppState>,
    kind: ResourceKind,
    method: &Method,
) -> MethodRouter<AppState> {
    if *method == Method::GET {
        route.get(
            move |State(state): State<AppState>, Path(params): Path<Params>| {
                handler::get(state, kind, params)
            },
        )
    } else if *method == Method::PUT {
        route.put(
            move |State(state): State<AppState>, Path(params): Path<Params>, body: Bytes| {
                handler::update(state, kind, params, body)
            },
        )
    } else if *method == Method::DELETE {
        route.delete(
            move |State(state): State<AppState>, Path(params): Path<Params>| {
                handler::delete(state, kind, params)
            },
        )
    } else if *method == Method::POST {
        route.post(
            move |State(state): State<AppState>,
                  Path(params): Path<Params>,
                  Query(query): Query<Params>,
                  body: Bytes| { handler::action(state, kind, params, query, body) },
        )
    } else {
        unsupported(kind, method);
        route
    }
}

fn unsupported(kind: ResourceKind, method: &Method) {
    tracing::warn!(kind = %kind, %method, "no handler for method, route left without it");
}
