use axum::response::Html;
use tracing::instrument;

/// The upload page.
///
/// The action and field name must match `common::v1::upload`.
const UPLOAD_FORM: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Upload a file</title>
</head>
<body>
    <form action="/upload" method="post" enctype="multipart/form-data">
        <input type="file" name="myFile">
        <input type="submit" value="Upload File">
    </form>
</body>
</html>
"#;

/// Serves the upload form.
#[instrument(skip_all)]
pub async fn get() -> Html<&'static str> {
    Html(UPLOAD_FORM)
}
