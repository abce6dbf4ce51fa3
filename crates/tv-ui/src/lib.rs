use askama::Template;

/// Shell page. Everything dynamic is fetched by `/static/app.js`.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub title: &'a str,
    /// Extensions offered by the file picker, without the leading dot.
    pub accepted: &'a [&'a str],
}
