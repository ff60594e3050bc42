// HTML → PDF for cover letters.
// Chromium runs out of process behind a Gotenberg-compatible HTTP API; this module
// only wraps the letter in a print stylesheet and ships it over multipart.

pub mod handlers;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

/// A4 in inches, as the conversion API expects.
const PAPER_WIDTH_IN: &str = "8.27";
const PAPER_HEIGHT_IN: &str = "11.7";
/// 15 mm sides and top, 17 mm bottom.
const MARGIN_IN: &str = "0.59";
const MARGIN_BOTTOM_IN: &str = "0.67";

const LETTER_STYLESHEET: &str = r#"
      @page { size: A4; margin: 15mm 15mm 17mm 15mm; }
      body { font-family: Arial, sans-serif; font-size: 10.5pt; line-height: 1.45; text-align: justify; margin: 0; padding: 0; }
      p { margin: 0 0 9pt 0; }
      ul { margin: 0 0 9pt 14pt; padding: 0; }
      li { margin: 0 0 6pt 0; }
      strong { font-weight: 600; }
      br + br { line-height: 0; }
"#;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("PDF service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("PDF service returned an empty document")]
    Empty,
}

/// Turns a full HTML document into PDF bytes.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str) -> Result<Bytes, RenderError>;
}

/// Wraps the letter fragment produced by the editor into a printable A4 document.
pub fn wrap_letter_html(fragment: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n  <head>\n    <meta charset=\"utf-8\" />\n    <style>{LETTER_STYLESHEET}    </style>\n  </head>\n  <body>{fragment}</body>\n</html>\n"
    )
}

pub struct GotenbergRenderer {
    client: Client,
    base_url: String,
}

impl GotenbergRenderer {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn form(html: &str) -> Result<Form, RenderError> {
        let index = Part::text(html.to_string())
            .file_name("index.html")
            .mime_str("text/html; charset=utf-8")?;

        Ok(Form::new()
            .part("files", index)
            .text("paperWidth", PAPER_WIDTH_IN)
            .text("paperHeight", PAPER_HEIGHT_IN)
            .text("marginTop", MARGIN_IN)
            .text("marginRight", MARGIN_IN)
            .text("marginBottom", MARGIN_BOTTOM_IN)
            .text("marginLeft", MARGIN_IN)
            .text("printBackground", "true"))
    }
}

#[async_trait]
impl PdfRenderer for GotenbergRenderer {
    async fn render(&self, html: &str) -> Result<Bytes, RenderError> {
        let url = format!("{}/forms/chromium/convert/html", self.base_url);
        debug!("Rendering PDF via {url} ({} bytes of HTML)", html.len());

        let response = self
            .client
            .post(&url)
            .multipart(Self::form(html)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RenderError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let pdf = response.bytes().await?;
        if pdf.is_empty() {
            return Err(RenderError::Empty);
        }
        info!("PDF rendered ({} bytes)", pdf.len());
        Ok(pdf)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_wrap_sets_a4_print_styles() {
        let html = wrap_letter_html("<p>Monsieur, Madame,</p>");
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<meta charset=\"utf-8\" />"));
        assert!(html.contains("size: A4"));
        assert!(html.contains("font-size: 10.5pt"));
        assert!(html.contains("line-height: 1.45"));
        assert!(html.contains("text-align: justify"));
        assert!(html.contains("<body><p>Monsieur, Madame,</p></body>"));
    }

    #[tokio::test]
    async fn test_posts_index_html_to_conversion_endpoint() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/forms/chromium/convert/html")
                    .body_contains("filename=\"index.html\"")
                    .body_contains("paperWidth")
                    .body_contains("<p>Bonjour</p>");
                then.status(200)
                    .header("content-type", "application/pdf")
                    .body("%PDF-1.7 rendered");
            })
            .await;

        let renderer = GotenbergRenderer::new(Client::new(), format!("{}/", server.base_url()));
        let pdf = renderer.render(&wrap_letter_html("<p>Bonjour</p>")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(&pdf[..], b"%PDF-1.7 rendered");
    }

    #[tokio::test]
    async fn test_service_error_keeps_status_and_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/forms/chromium/convert/html");
                then.status(503).body("busy");
            })
            .await;

        let renderer = GotenbergRenderer::new(Client::new(), server.base_url());
        match renderer.render("<p>x</p>").await {
            Err(RenderError::Service { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "busy");
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_document_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/forms/chromium/convert/html");
                then.status(200);
            })
            .await;

        let renderer = GotenbergRenderer::new(Client::new(), server.base_url());
        assert!(matches!(
            renderer.render("<p>x</p>").await,
            Err(RenderError::Empty)
        ));
    }
}
