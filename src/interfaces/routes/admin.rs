use actix_web::web;

use crate::handlers::{admin, system::admin_health_check};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(
                web::resource("/users")
                    .route(web::get().to(admin::get_users))
                    .route(web::post().to(admin::create_user)),
            )
            .service(
                web::resource("/users/{user_id}")
                    .route(web::get().to(admin::get_user))
                    .route(web::put().to(admin::update_user))
                    .route(web::delete().to(admin::delete_user)),
            )
            .service(web::resource("/dashboard-stats").route(web::get().to(admin::dashboard_stats)))
            .service(web::resource("/recent-activities").route(web::get().to(admin::recent_activities)))
            .service(web::resource("/health").route(web::get().to(admin_health_check))),
    );
}
