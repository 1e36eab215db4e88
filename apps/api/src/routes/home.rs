use axum::response::Html;

/// GET /
/// Landing page describing the upload contract.
pub async fn home_handler() -> Html<&'static str> {
    Html(
        r#"<div style="text-align:center;margin-top:80px;font-family:Arial;">
  <h1>ATS RÉSUMÉ SCANNER</h1>
  <h2>POST → <code>/scan/resume</code></h2>
  <p><strong>Key:</strong> cv | <strong>Type:</strong> File | <strong>Accept:</strong> .pdf</p>
  <h3>90+ only with the official template</h3>
</div>"#,
    )
}
