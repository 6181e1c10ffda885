use crate::{
    api::{attendance, dashboard, department, employee, job_role, leave_request, notification},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    pages,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public token endpoints
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected JSON API
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(web::resource("/me").route(web::get().to(handlers::me)))
            .service(
                web::scope("/employees")
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(employee::update_employee))
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/departments")
                    .service(
                        web::resource("")
                            .route(web::post().to(department::create_department))
                            .route(web::get().to(department::list_departments)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(department::update_department))
                            .route(web::get().to(department::get_department))
                            .route(web::delete().to(department::delete_department)),
                    ),
            )
            .service(
                web::scope("/roles")
                    .service(
                        web::resource("")
                            .route(web::post().to(job_role::create_job_role))
                            .route(web::get().to(job_role::list_job_roles)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(job_role::update_job_role))
                            .route(web::get().to(job_role::get_job_role))
                            .route(web::delete().to(job_role::delete_job_role)),
                    ),
            )
            .service(
                web::scope("/leave")
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(leave_request::get_leave))
                            .route(web::delete().to(leave_request::delete_leave)),
                    )
                    .service(
                        web::resource("/{id}/status")
                            .route(web::put().to(leave_request::decide_leave)),
                    )
                    .service(
                        web::resource("/{id}/cancel")
                            .route(web::put().to(leave_request::cancel_leave)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(web::resource("").route(web::get().to(attendance::list_attendance)))
                    .service(
                        web::resource("/check-in").route(web::post().to(attendance::check_in)),
                    )
                    .service(
                        web::resource("/check-out").route(web::put().to(attendance::check_out)),
                    ),
            )
            .service(
                web::scope("/dashboard")
                    .service(web::resource("/stats").route(web::get().to(dashboard::stats)))
                    .service(
                        web::resource("/departments")
                            .route(web::get().to(dashboard::department_distribution)),
                    )
                    .service(
                        web::resource("/attendance-trend")
                            .route(web::get().to(dashboard::attendance_trend)),
                    ),
            )
            .service(
                web::scope("/notifications")
                    .service(web::resource("/counts").route(web::get().to(notification::counts)))
                    .service(web::resource("/stream").route(web::get().to(notification::stream))),
            ),
    );

    // Server-rendered pages; they redirect to /login on their own
    cfg.service(
        web::resource("/login")
            .wrap(login_limiter)
            .route(web::get().to(pages::login_form))
            .route(web::post().to(pages::login_submit)),
    )
    .service(web::resource("/logout").route(web::post().to(pages::logout)))
    .service(web::resource("/").route(web::get().to(pages::dashboard)))
    .service(web::resource("/employees").route(web::get().to(pages::employees)))
    .service(
        web::resource("/leave")
            .route(web::get().to(pages::leave))
            .route(web::post().to(pages::leave_submit)),
    )
    .service(web::resource("/attendance").route(web::get().to(pages::attendance)));
}
