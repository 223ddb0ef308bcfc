//! The feature payload deployed to infected users.

use std::fmt;

/// A site feature that can be rolled out to users.
///
/// The infection engine never inspects a feature; it only attaches a shared
/// handle to every user it selects. Equality is structural.
///
/// # Examples
/// ```
/// use rollout_core::Feature;
///
/// let feature = Feature::new("Cool Blue", vec!["1.0".into(), "1.1".into()], "1.2");
/// assert_eq!(feature.name(), "Cool Blue");
/// assert_eq!(feature.supported_versions(), ["1.0", "1.1"]);
/// assert_eq!(feature.current_version(), "1.2");
/// assert_eq!(feature, Feature::new("Cool Blue", vec!["1.0".into(), "1.1".into()], "1.2"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Feature {
    name: String,
    supported_versions: Vec<String>,
    current_version: String,
}

impl Feature {
    /// Creates a feature from its name, supported versions, and current
    /// version.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        supported_versions: Vec<String>,
        current_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            supported_versions,
            current_version: current_version.into(),
        }
    }

    /// Feature name, e.g. `Cool Blue NavBar`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Versions still supported, oldest first.
    #[must_use]
    pub fn supported_versions(&self) -> &[String] {
        &self.supported_versions
    }

    /// The version being rolled out.
    #[must_use]
    pub fn current_version(&self) -> &str {
        &self.current_version
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.current_version)
    }
}
