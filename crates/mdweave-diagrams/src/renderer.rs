//! Diagram rendering strategies.

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use base64::Engine;
use base64::prelude::BASE64_URL_SAFE;
use mdweave_document::Image;
use tracing::{debug, warn};
use ureq::Agent;

use crate::cache::DiagramCache;
use crate::png::png_dimensions;

/// Default HTTP timeout for remote rendering requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Diagram rendering failure.
///
/// String-typed payloads keep the error cloneable so failures can live in
/// the per-run cache alongside successful renders.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("renderer command failed: {0}")]
    Command(String),
    #[error("renderer returned invalid PNG data")]
    InvalidPng,
}

/// How diagrams are rasterized, selected once per run.
#[derive(Clone, Debug)]
pub enum RenderStrategy {
    /// mermaid.ink-style endpoint taking base64url-encoded source in the URL.
    Remote {
        base_url: String,
        timeout: Duration,
    },
    /// `mmdc`-style executable taking `-i <input> -o <output>`.
    Local { command: PathBuf },
}

/// Rendering collaborator behind [`DiagramRenderer`].
///
/// The two production backends implement the strategies above; tests supply
/// fakes to observe invocation counts and force failures.
pub trait RenderBackend {
    fn render(&self, source: &str) -> Result<Image, RenderError>;
}

/// Caching diagram renderer for one conversion run.
pub struct DiagramRenderer {
    backend: Box<dyn RenderBackend>,
    cache: DiagramCache,
}

impl DiagramRenderer {
    /// Create a renderer for the given strategy with a fresh cache.
    #[must_use]
    pub fn new(strategy: RenderStrategy) -> Self {
        let backend: Box<dyn RenderBackend> = match strategy {
            RenderStrategy::Remote { base_url, timeout } => {
                Box::new(RemoteBackend::new(base_url, timeout))
            }
            RenderStrategy::Local { command } => Box::new(LocalBackend { command }),
        };
        Self::with_backend(backend)
    }

    /// Create a renderer over an arbitrary backend.
    #[must_use]
    pub fn with_backend(backend: Box<dyn RenderBackend>) -> Self {
        Self {
            backend,
            cache: DiagramCache::new(),
        }
    }

    /// Render a diagram, consulting the per-run cache first.
    ///
    /// Failures are cached too: a second identical diagram in the same
    /// document does not retry the collaborator.
    pub fn render(&mut self, source: &str) -> Result<Image, RenderError> {
        if let Some(cached) = self.cache.get(source) {
            debug!("diagram cache hit");
            return cached.clone();
        }
        let result = self.backend.render(source);
        self.cache.insert(source, result.clone());
        result
    }
}

/// Remote rendering via a mermaid.ink-style HTTP endpoint.
struct RemoteBackend {
    base_url: String,
    agent: Agent,
}

impl RemoteBackend {
    fn new(base_url: String, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { base_url, agent }
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, RenderError> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| RenderError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            return Err(RenderError::Http(format!("HTTP {status}: {error_body}")));
        }

        body.read_to_vec().map_err(|e| RenderError::Io(e.to_string()))
    }
}

impl RenderBackend for RemoteBackend {
    fn render(&self, source: &str) -> Result<Image, RenderError> {
        let encoded = BASE64_URL_SAFE.encode(source.as_bytes());
        let url = format!("{}/img/{}", self.base_url.trim_end_matches('/'), encoded);

        // Exactly one retry on timeout or a non-success response.
        let data = match self.fetch(&url) {
            Ok(data) => data,
            Err(err) => {
                warn!("remote render failed, retrying once: {err}");
                self.fetch(&url)?
            }
        };

        image_from_png(data)
    }
}

/// Local rendering via an external executable.
///
/// Input and output files live in a scoped temporary directory that is
/// removed when the render call returns, on every exit path.
struct LocalBackend {
    command: PathBuf,
}

impl RenderBackend for LocalBackend {
    fn render(&self, source: &str) -> Result<Image, RenderError> {
        let dir = tempfile::tempdir().map_err(|e| RenderError::Io(e.to_string()))?;
        let input = dir.path().join("diagram.mmd");
        let output = dir.path().join("diagram.png");

        std::fs::write(&input, source).map_err(|e| RenderError::Io(e.to_string()))?;

        let result = Command::new(&self.command)
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .args(["-t", "default", "-b", "white"])
            .output()
            .map_err(|e| RenderError::Io(e.to_string()))?;

        if !result.status.success() {
            return Err(RenderError::Command(
                String::from_utf8_lossy(&result.stderr).trim().to_owned(),
            ));
        }

        let data = std::fs::read(&output).map_err(|e| RenderError::Io(e.to_string()))?;
        image_from_png(data)
    }
}

fn image_from_png(data: Vec<u8>) -> Result<Image, RenderError> {
    let (width_px, height_px) = png_dimensions(&data).ok_or(RenderError::InvalidPng)?;
    Ok(Image {
        bytes: data,
        width_px,
        height_px,
    })
}

/// Backend fake shared by tests across this crate.
#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::Cell;
    use std::rc::Rc;

    use mdweave_document::Image;

    use super::{RenderBackend, RenderError};
    use crate::png::test_png;

    /// Counts invocations and returns a fixed outcome.
    pub(crate) struct CountingBackend {
        pub calls: Rc<Cell<usize>>,
        pub outcome: Result<Image, RenderError>,
    }

    impl CountingBackend {
        pub(crate) fn ok(calls: Rc<Cell<usize>>) -> Self {
            Self {
                calls,
                outcome: Ok(Image {
                    bytes: test_png(40, 20),
                    width_px: 40,
                    height_px: 20,
                }),
            }
        }

        pub(crate) fn failing(calls: Rc<Cell<usize>>) -> Self {
            Self {
                calls,
                outcome: Err(RenderError::Http("HTTP 503: unavailable".to_owned())),
            }
        }
    }

    impl RenderBackend for CountingBackend {
        fn render(&self, _source: &str) -> Result<Image, RenderError> {
            self.calls.set(self.calls.get() + 1);
            self.outcome.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::test_support::CountingBackend;
    use super::*;

    #[test]
    fn test_identical_source_renders_once() {
        let calls = Rc::new(Cell::new(0));
        let mut renderer =
            DiagramRenderer::with_backend(Box::new(CountingBackend::ok(Rc::clone(&calls))));

        let first = renderer.render("graph TD");
        let second = renderer.render("graph TD");

        assert_eq!(calls.get(), 1);
        assert_eq!(first, second);
        assert!(first.is_ok());
    }

    #[test]
    fn test_failures_are_cached_too() {
        let calls = Rc::new(Cell::new(0));
        let mut renderer =
            DiagramRenderer::with_backend(Box::new(CountingBackend::failing(Rc::clone(&calls))));

        assert!(renderer.render("graph TD").is_err());
        assert!(renderer.render("graph TD").is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_different_sources_render_separately() {
        let calls = Rc::new(Cell::new(0));
        let mut renderer =
            DiagramRenderer::with_backend(Box::new(CountingBackend::ok(Rc::clone(&calls))));

        renderer.render("graph TD").unwrap();
        renderer.render("graph LR").unwrap();

        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_local_backend_missing_command_is_io_error() {
        let backend = LocalBackend {
            command: PathBuf::from("/nonexistent/mdweave-test-mmdc"),
        };
        assert!(matches!(
            backend.render("graph TD"),
            Err(RenderError::Io(_))
        ));
    }

    #[test]
    fn test_image_from_png_rejects_garbage() {
        assert_eq!(
            image_from_png(b"not a png".to_vec()),
            Err(RenderError::InvalidPng)
        );
    }
}
