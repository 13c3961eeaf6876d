use std::sync::Arc;
use std::time::Duration;

use poem::{
    middleware::{AddData, AddDataEndpoint, Cors, CorsEndpoint},
    EndpointExt, Route,
};
use poem_openapi::OpenApiService;

use body_limit::{BodyLimit, BodyLimitEndpoint};
use pixpress_core::Compressor;
use rate_limit::{InMemoryCounterStore, RateLimit, RateLimitEndpoint};
use settings::Config;

use crate::routes::compress::ApiCompress;

pub mod body_limit;
pub mod error;
pub mod rate_limit;
pub mod routes;
pub mod schemas;
pub mod settings;

pub struct AppState {
    pub compressor: Arc<Compressor>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            compressor: Arc::new(Compressor::new()),
            config,
        }
    }
}

pub type AppEndpoint = CorsEndpoint<
    AddDataEndpoint<
        RateLimitEndpoint<BodyLimitEndpoint<Route>, InMemoryCounterStore>,
        Arc<AppState>,
    >,
>;

pub fn init_openapi_route(app_state: Arc<AppState>) -> AppEndpoint {
    let config = &app_state.config;
    let prefix = config.prefix.clone();
    let openapi_route = OpenApiService::new(ApiCompress, "Pixpress API", env!("CARGO_PKG_VERSION"))
        .server(prefix.clone());

    let store = Arc::new(InMemoryCounterStore::new(Duration::from_secs(
        config.rate_limit_window_secs,
    )));
    let rate_limit = RateLimit::new(store, config.rate_limit_max)
        .trust_forwarded_for(config.trust_forwarded_for);

    let body_limit = BodyLimit::for_upload(config.max_upload_bytes);

    let openapi_json_endpoint = openapi_route.spec_endpoint();
    let ui = openapi_route.swagger_ui();
    Route::new()
        .nest(prefix, openapi_route)
        .nest("/docs", ui)
        .at("/openapi.json", openapi_json_endpoint)
        .with(body_limit)
        .with(rate_limit)
        .with(AddData::new(app_state))
        .with(Cors::new())
}
