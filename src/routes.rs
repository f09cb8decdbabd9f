use crate::{
    api::{attendance, dashboard, employee, health},
    config::Config,
    errors::ApiError,
    service::AppState,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::Condition, web};

type Limiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-peer limiter allowing `requests_per_min`, or `None` when disabled.
fn build_limiter(requests_per_min: u32) -> Option<Limiter> {
    if requests_per_min == 0 {
        return None;
    }

    let per_ms = (60_000 / u64::from(requests_per_min)).max(1);
    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .map(|cfg| Governor::new(&cfg))
}

pub fn configure(cfg: &mut web::ServiceConfig, state: web::Data<AppState>, config: &Config) {
    let limiter = build_limiter(config.rate_per_min);
    let limited = limiter.is_some();
    let limiter = limiter.unwrap_or_else(|| Governor::new(&GovernorConfig::default()));

    // Malformed bodies and query strings get the same envelope as other
    // validation failures.
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::validation(format!("Invalid request body: {err}")).into());
    let query_config = web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::validation(format!("Invalid query string: {err}")).into());

    cfg.app_data(state)
        .app_data(json_config)
        .app_data(query_config)
        .service(health::index)
        .service(
            web::scope(&config.api_prefix)
                .wrap(Condition::new(limited, limiter))
                .route("/health", web::get().to(health::health))
                .service(
                    web::scope("/employees")
                        // /employees
                        .service(
                            web::resource("")
                                .route(web::get().to(employee::list_employees))
                                .route(web::post().to(employee::create_employee)),
                        )
                        // /employees/{id}
                        .service(
                            web::resource("/{id}")
                                .route(web::delete().to(employee::delete_employee)),
                        ),
                )
                .service(
                    web::scope("/attendance")
                        // /attendance
                        .service(
                            web::resource("")
                                .route(web::get().to(attendance::list_attendance))
                                .route(web::post().to(attendance::mark_attendance)),
                        )
                        // /attendance/summary/{employee_id}
                        .service(
                            web::resource("/summary/{employee_id}")
                                .route(web::get().to(attendance::attendance_summary)),
                        )
                        // /attendance/history/{employee_id}
                        .service(
                            web::resource("/history/{employee_id}")
                                .route(web::get().to(attendance::attendance_history)),
                        ),
                )
                .service(
                    web::scope("/dashboard")
                        .route("/stats", web::get().to(dashboard::dashboard_stats)),
                ),
        )
        .default_service(web::to(health::not_found));
}
