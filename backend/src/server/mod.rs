//! HTTP server wiring: route registration shared by `main` and tests.

pub mod config;

use actix_web::web;

use crate::inbound::http::{friends, health, users};

/// Register the versioned API scope.
///
/// `/users/me` and the friend routes must register before the `{email}`
/// matcher so their literal segments are not captured as an email.
pub fn configure_api(service_config: &mut web::ServiceConfig) {
    service_config.service(
        web::scope("/api/v1")
            .service(users::register)
            .service(users::login)
            .service(users::list_users)
            .service(users::current_user)
            .service(friends::add_friend)
            .service(friends::remove_friend)
            .service(users::get_user)
            .service(users::update_user)
            .service(users::delete_user),
    );
}

/// Register the unversioned health probes.
pub fn configure_health(service_config: &mut web::ServiceConfig) {
    service_config.service(health::ready).service(health::live);
}
