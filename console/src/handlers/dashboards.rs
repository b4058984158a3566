//! Authenticated dashboard surfaces. Thin by design: the access gate has
//! already authorized the request by the time these run, so they only
//! render the signed-in identity.

use askama::Template;
use axum::response::IntoResponse;

use crate::models::CurrentUser;

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub email: String,
    pub name: String,
}

#[derive(Template)]
#[template(path = "staff.html")]
pub struct StaffTemplate {
    pub email: String,
    pub name: String,
}

#[derive(Template)]
#[template(path = "portal.html")]
pub struct PortalTemplate {
    pub email: String,
    pub name: String,
}

pub async fn admin_dashboard(user: CurrentUser) -> impl IntoResponse {
    AdminTemplate {
        name: user.identity().display_name(),
        email: user.email,
    }
}

pub async fn staff_dashboard(user: CurrentUser) -> impl IntoResponse {
    StaffTemplate {
        name: user.identity().display_name(),
        email: user.email,
    }
}

pub async fn portal_home(user: CurrentUser) -> impl IntoResponse {
    PortalTemplate {
        name: user.identity().display_name(),
        email: user.email,
    }
}
