use actix_web::web;

use crate::handlers::contact;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/contact")
            .service(
                web::resource("")
                    .route(web::post().to(contact::submit_contact))
                    .route(web::get().to(contact::get_contacts)),
            )
            .service(
                web::resource("/{contact_id}")
                    .route(web::get().to(contact::get_contact))
                    .route(web::delete().to(contact::delete_contact)),
            )
            .service(
                web::resource("/{contact_id}/read")
                    .route(web::put().to(contact::mark_contact_read)),
            ),
    );
}
