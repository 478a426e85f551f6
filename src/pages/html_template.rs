use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// Renders an askama template as an HTML response, or a 500 if rendering fails
pub struct HtmlTemplate<T> {
    pub template: T,
}

impl<T: Template> HtmlTemplate<T> {
    pub fn new(template: T) -> Self {
        HtmlTemplate { template }
    }
}

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.template.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                tracing::error!("Failed to render template. Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
