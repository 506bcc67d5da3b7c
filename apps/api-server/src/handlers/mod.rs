//! HTTP handlers and route configuration.

mod health;
mod posts;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::index)).service(
        web::scope("/v1")
            .route("", web::get().to(health::index))
            .route("/posts", web::post().to(posts::create_post))
            .route("/posts", web::get().to(posts::list_by_author))
            .route("/posts/{post_id}", web::get().to(posts::get_post))
            .route(
                "/posts/{longitude}/{latitude}",
                web::get().to(posts::get_posts_nearby),
            ),
    );
}
