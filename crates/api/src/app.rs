use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::{CategoryService, ProductService, SkillVideoService};
use domain::store::CatalogStore;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_business_auth, security_headers_middleware,
    trace_id,
};
use crate::routes::{categories, health, products, skill_videos};
use crate::services::{KeyCache, KeySource, TokenVerifier, VideoStatsSource};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn CatalogStore>,
    pub verifier: Arc<TokenVerifier>,
    pub video_stats: Arc<dyn VideoStatsSource>,
    pub categories: CategoryService,
    pub products: ProductService,
    pub videos: SkillVideoService,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn CatalogStore>,
        key_source: Arc<dyn KeySource>,
        video_stats: Arc<dyn VideoStatsSource>,
    ) -> Self {
        let keys = KeyCache::new(
            key_source,
            Duration::from_secs(config.identity.key_ttl_secs),
        );
        let verifier = TokenVerifier::new(Arc::new(keys), config.identity.leeway_secs);
        let mint_attempts = config.catalog.mint_max_attempts;

        Self {
            categories: CategoryService::new(store.clone(), mint_attempts),
            products: ProductService::new(store.clone(), mint_attempts),
            videos: SkillVideoService::new(store.clone()),
            config: Arc::new(config),
            store,
            verifier: Arc::new(verifier),
            video_stats,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Business routes: every handler runs with a verified tenant.
    let business_routes = Router::new()
        .route(
            "/api/categories/",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/api/categories/:category_id/",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/api/categories/:category_id/products/",
            get(categories::category_products),
        )
        .route(
            "/api/products/",
            get(products::list_products).post(products::create_product),
        )
        .route("/api/products/featured/", get(products::featured_products))
        .route(
            "/api/products/:product_id/",
            get(products::get_product)
                .put(products::replace_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/api/business/skill-video/create/",
            post(skill_videos::create_skill_video),
        )
        .route(
            "/api/business/skill-video/list/",
            get(skill_videos::list_business_videos),
        )
        .route(
            "/api/business/skill-video/detail/",
            get(skill_videos::skill_video_detail),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_business_auth,
        ));

    let public_routes = Router::new()
        .route(
            "/api/member/skill-video/list/",
            get(skill_videos::member_video_list),
        )
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(business_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            config.security.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
