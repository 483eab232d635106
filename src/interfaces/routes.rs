use actix_web::web;

use crate::handlers::{
    home::{api_status, home},
    json_error::route_not_found,
};

mod admin;
mod auth;
mod contact;
mod json_error;
mod projects;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(json_error::config_routes);

    cfg.service(web::resource("/").route(web::get().to(home)));

    cfg.service(
        web::scope("/api")
            .service(web::resource("/status").route(web::get().to(api_status)))
            .configure(auth::config_routes)
            .configure(contact::config_routes)
            .configure(projects::config_routes)
            .configure(admin::config_routes)
            .default_service(web::to(route_not_found)),
    );

    cfg.default_service(web::to(route_not_found));
}
