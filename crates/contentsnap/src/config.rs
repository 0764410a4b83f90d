//! Pipeline configuration.

/// Default keywords that earn a bullet the emphasis marker.
pub const DEFAULT_EMPHASIS_KEYWORDS: [&str; 4] = ["climax", "ending", "final", "conclusion"];

/// Default prefix for emphasized bullets.
pub const DEFAULT_EMPHASIS_MARKER: &str = "🎬 ";

/// Default maximum number of bullets.
pub const DEFAULT_BULLET_CAP: usize = 20;

/// Settings for [`produce_summary`](crate::pipeline::produce_summary) that
/// are fixed per deployment rather than per request.
///
/// ```
/// use contentsnap::PipelineConfig;
///
/// let config = PipelineConfig::default()
///     .with_emphasis_keywords(["verdict", "outcome"])
///     .with_bullet_cap(10);
/// assert_eq!(config.bullet_cap, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Lowercase keywords matched case-insensitively against each bullet.
    /// Empty disables emphasis.
    pub emphasis_keywords: Vec<String>,
    pub emphasis_marker: String,
    pub bullet_cap: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            emphasis_keywords: DEFAULT_EMPHASIS_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            emphasis_marker: DEFAULT_EMPHASIS_MARKER.to_string(),
            bullet_cap: DEFAULT_BULLET_CAP,
        }
    }
}

impl PipelineConfig {
    /// Replace the emphasis keywords. Keywords are lowercased.
    pub fn with_emphasis_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.emphasis_keywords = keywords
            .into_iter()
            .map(|k| k.into().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        self
    }

    pub fn with_emphasis_marker(mut self, marker: impl Into<String>) -> Self {
        self.emphasis_marker = marker.into();
        self
    }

    /// Set the bullet cap. Zero is raised to one.
    pub fn with_bullet_cap(mut self, cap: usize) -> Self {
        self.bullet_cap = cap.max(1);
        self
    }

    /// Whether `text` mentions any emphasis keyword.
    pub fn is_emphasized(&self, text: &str) -> bool {
        if self.emphasis_keywords.is_empty() {
            return false;
        }
        let lower = text.to_lowercase();
        self.emphasis_keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}
