//! Static sale page rendering.
//!
//! Both values are inserted verbatim. Markup in `url` or `text` ends up in the
//! page unescaped, so callers must only pass trusted content.

pub fn render_sale_page(presigned_url: &str, sales_text: &str) -> String {
    log::info!(
        "Generating sale page with URL: {} and text: {}",
        presigned_url,
        sales_text
    );
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0"/>
  <title>S3 PNG Gallery</title>
  <style>
    body {{
      font-family: sans-serif;
      text-align: center;
      padding: 2rem;
      background-color: #f9f9f9;
    }}
    img {{
      max-width: 100%;
      height: auto;
      margin: 1rem;
      border: 1px solid #ccc;
      box-shadow: 2px 2px 5px rgba(0,0,0,0.1);
    }}
  </style>
</head>
<body>
  <h1>PNG Gallery from S3</h1>
  <img src="{url}" alt="Generated Image">
  <h2>"{text}"</h2>
</body>
</html>"#,
        url = presigned_url,
        text = sales_text
    )
}
