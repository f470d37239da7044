//! NorthStar process advisor.
//!
//! Wires the form catalog, the trained pipeline and the embedded video into
//! one [`Advisor`]. An advisor is created once at startup; every user gets a
//! [`Session`] holding their form values and last outcome.
//!
//! Startup is all-or-nothing: [`Advisor::start`] reads the video first and
//! the model second, and either failure is returned before any page can be
//! rendered.
//!
//! # Entry Points
//!
//! - [`Advisor::start`] loads the media and the model.
//! - [`Advisor::trigger`] runs one prediction cycle for a session.
//! - [`Advisor::render`] produces the full page for a session.
//! - [`generate`] writes `index.html` and `css/style.css` to a directory.
//! - [`console::run`] drives a session from a line-oriented input.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod console;
pub mod error;
pub mod invoker;
pub mod media;
pub mod renderer;
pub mod session;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use northstar_params::{Catalog, FormState};
use northstar_pipeline::{Classifier, PipelineError, TrainedPipeline};

pub use config::{AdvisorConfig, ConfigError, CONFIG_ENV, MODEL_PATH, VIDEO_PATH};
pub use console::{Command, CommandError};
pub use error::StartupError;
pub use invoker::{invoke, invoke_record, Prediction, Report};
pub use renderer::Stylesheet;
pub use session::{Outcome, Phase, Session};

/// Shared classifier handle.
pub type SharedClassifier = Box<dyn Classifier + Send + Sync>;

/// The loaded advisor: catalog, classifier, encoded video and settings.
pub struct Advisor {
    catalog: &'static Catalog,
    classifier: SharedClassifier,
    video_base64: String,
    config: AdvisorConfig,
}

impl std::fmt::Debug for Advisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Advisor")
            .field("config", &self.config)
            .field("video_base64_len", &self.video_base64.len())
            .finish_non_exhaustive()
    }
}

impl Advisor {
    /// Loads the video, then the model, as named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::MediaMissing`] or
    /// [`StartupError::MediaUnreadable`] for the video, and
    /// [`StartupError::Model`] if the artifact is missing or corrupt. Both
    /// name the offending path.
    pub fn start(config: AdvisorConfig) -> Result<Self, StartupError> {
        let video_base64 = media::load_video_base64(&config.video_path)?;
        let pipeline = TrainedPipeline::load(&config.model_path)?;
        log::info!("advisor ready");
        Ok(Self::with_classifier(config, Box::new(pipeline), video_base64))
    }

    /// Assembles an advisor from parts that are already loaded.
    #[must_use]
    pub fn with_classifier(
        config: AdvisorConfig,
        classifier: SharedClassifier,
        video_base64: String,
    ) -> Self {
        Self {
            catalog: Catalog::full(),
            classifier,
            video_base64,
            config,
        }
    }

    /// The field catalog.
    #[must_use]
    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    /// Effective settings.
    #[must_use]
    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// The loaded classifier.
    #[must_use]
    pub fn classifier(&self) -> &(dyn Classifier + Send + Sync) {
        self.classifier.as_ref()
    }

    /// A new session with every default and the configured range policy.
    #[must_use]
    pub fn new_session(&self) -> Session {
        Session::new(self.catalog, self.config.out_of_range)
    }

    /// Runs one prediction cycle for `session`.
    pub fn trigger<'s>(&self, session: &'s mut Session) -> &'s Outcome {
        session.trigger(self.classifier.as_ref())
    }

    /// Predicts directly from form values, without a session.
    ///
    /// # Errors
    ///
    /// Propagates the classifier's schema errors.
    pub fn predict(&self, form: &FormState) -> Result<Prediction, PipelineError> {
        invoke(self.classifier.as_ref(), form)
    }

    /// The full page for `session` with the stylesheet inlined.
    #[must_use]
    pub fn render(&self, session: &Session) -> String {
        self.render_with(session, Stylesheet::Inline(style_css()))
    }

    /// The full page for `session` with the given stylesheet.
    #[must_use]
    pub fn render_with(&self, session: &Session, stylesheet: Stylesheet<'_>) -> String {
        let copy = &self.catalog.copy;
        let mut body = renderer::render_header(copy);
        body.push_str(&renderer::render_video(&self.video_base64));
        body.push_str(&renderer::render_form(session.form(), copy));
        body.push_str(&renderer::render_outcome(
            session.outcome(),
            self.config.probability_precision,
        ));
        renderer::render_page(copy.title, &body, stylesheet)
    }

    /// Writes the self-contained page for `session` to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be
    /// written.
    pub fn write_page(&self, session: &Session, path: &Path) -> Result<()> {
        write(path, &self.render(session))
    }

    /// Writes `index.html` linking `css/style.css`, and the stylesheet.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be written.
    pub fn write_site(&self, session: &Session, out_dir: &Path) -> Result<()> {
        let page = self.render_with(session, Stylesheet::Linked("css/style.css"));
        write(&out_dir.join("index.html"), &page)?;
        write(&out_dir.join("css").join("style.css"), style_css())?;
        Ok(())
    }
}

/// Starts an advisor from `config` and writes the default page to `out_dir`.
///
/// # Errors
///
/// Returns the startup error if the video or model cannot be loaded, or a
/// write error if the output cannot be created.
pub fn generate(out_dir: &Path, config: &AdvisorConfig) -> Result<()> {
    let advisor = Advisor::start(config.clone())?;
    advisor.write_site(&advisor.new_session(), out_dir)?;
    log::info!("wrote {}", out_dir.join("index.html").display());
    Ok(())
}

/// The advisor stylesheet.
#[must_use]
pub fn style_css() -> &'static str {
    include_str!("../static/css/style.css")
}

fn write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use northstar_pipeline::Label;

    fn advisor() -> Advisor {
        let json = northstar_test_helpers::logistic_pipeline_json();
        let pipeline = TrainedPipeline::from_json(&json, Path::new("fixture.json")).unwrap();
        Advisor::with_classifier(AdvisorConfig::default(), Box::new(pipeline), "AAAA".to_string())
    }

    #[test]
    fn default_page_has_copy_form_and_no_result() {
        let advisor = advisor();
        let html = advisor.render(&advisor.new_session());
        assert!(html.contains("<h1>NorthStar — Process Advisor</h1>"));
        assert!(html.contains("<h3>Laser Powder Bed Fusion (L-PBF) Optimization</h3>"));
        assert!(html.contains("data:video/mp4;base64,AAAA"));
        assert!(html.contains("<style>"));
        assert!(!html.contains("class=\"result"));
    }

    #[test]
    fn defaults_predict_success() {
        let advisor = advisor();
        let mut session = advisor.new_session();
        match advisor.trigger(&mut session) {
            Outcome::Predicted(p) => {
                assert_eq!(p.label, Label::Success);
                assert_eq!(p.probability_text(5), "0.68604");
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        let html = advisor.render(&session);
        assert!(html.contains("<span class=\"success-badge\">SUCCESS</span>"));
        assert!(html.contains("<code>0.68604</code>"));
    }

    #[test]
    fn low_power_in_nitrogen_predicts_fail() {
        let advisor = advisor();
        let mut session = advisor.new_session();
        session.edit("power", "50").unwrap();
        session.edit("atmosphere", "Nitrogen").unwrap();
        let html = {
            advisor.trigger(&mut session);
            advisor.render(&session)
        };
        assert!(html.contains("<span class=\"fail-badge\">FAIL</span>"));
        assert!(html.contains("<code>0.24632</code>"));
    }

    #[test]
    fn precision_follows_config() {
        let json = northstar_test_helpers::logistic_pipeline_json();
        let pipeline = TrainedPipeline::from_json(&json, Path::new("fixture.json")).unwrap();
        let config = AdvisorConfig {
            probability_precision: 2,
            ..AdvisorConfig::default()
        };
        let advisor = Advisor::with_classifier(config, Box::new(pipeline), String::new());
        let mut session = advisor.new_session();
        advisor.trigger(&mut session);
        assert!(advisor.render(&session).contains("<code>0.69</code>"));
    }

    #[test]
    fn site_links_the_stylesheet() {
        let advisor = advisor();
        let dir = tempfile::tempdir().unwrap();
        advisor.write_site(&advisor.new_session(), dir.path()).unwrap();
        let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.contains("href=\"css/style.css\""));
        let css = fs::read_to_string(dir.path().join("css").join("style.css")).unwrap();
        assert!(css.contains(".success-badge"));
    }
}
