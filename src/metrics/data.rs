//! Data structures for container image metrics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder published when an image carries no repository tags.
pub const UNKNOWN_REPO: &str = "unknown";

/// A container as reported by the runtime's default listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerEntry {
    /// Runtime container id
    pub id: String,
    /// Display names, primary name first (Docker prefixes them with `/`)
    pub names: Vec<String>,
    /// Image reference the container was started from
    pub image: String,
    /// Runtime-assigned id of that image
    pub image_id: String,
}

impl ContainerEntry {
    /// The primary display name, if the runtime reported any.
    pub fn primary_name(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }
}

/// Image metadata returned by an inspect call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDetails {
    /// Image id
    pub id: String,
    /// `repository:tag` references, possibly empty
    pub repo_tags: Vec<String>,
}

impl ImageDetails {
    /// The first repository tag, or [`UNKNOWN_REPO`] for untagged images.
    pub fn primary_repo(&self) -> &str {
        self.repo_tags
            .first()
            .map(String::as_str)
            .unwrap_or(UNKNOWN_REPO)
    }
}

/// One label combination of the image info gauge.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContainerImageRecord {
    pub container_name: String,
    pub image_id: String,
    pub image_repo: String,
}

impl ContainerImageRecord {
    /// Derive the record for a container from its listing entry and image metadata.
    ///
    /// Returns `None` when the container has no name to publish under.
    pub fn derive(container: &ContainerEntry, image: &ImageDetails) -> Option<Self> {
        Some(Self {
            container_name: container.primary_name()?.to_string(),
            image_id: container.image_id.clone(),
            image_repo: image.primary_repo().to_string(),
        })
    }

    /// Label values in gauge label order.
    pub fn label_values(&self) -> [&str; 3] {
        [
            self.container_name.as_str(),
            self.image_id.as_str(),
            self.image_repo.as_str(),
        ]
    }
}

/// Outcome of one collection cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    /// When the cycle started
    pub started_at: DateTime<Utc>,
    /// Containers returned by the listing call
    pub listed: usize,
    /// Label combinations set on the gauge
    pub published: usize,
    /// Containers left out because inspection failed or they had no name
    pub skipped: usize,
}

impl CycleReport {
    pub fn new(listed: usize) -> Self {
        Self {
            started_at: Utc::now(),
            listed,
            published: 0,
            skipped: 0,
        }
    }

    /// Whether every listed container made it into the gauge.
    pub fn is_complete(&self) -> bool {
        self.skipped == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn web_container() -> ContainerEntry {
        ContainerEntry {
            id: "c1".to_string(),
            names: vec!["web-1".to_string(), "alias".to_string()],
            image: "sha256:abc".to_string(),
            image_id: "sha256:abc".to_string(),
        }
    }

    #[test]
    fn test_derive_uses_first_name_and_tag() {
        let image = ImageDetails {
            id: "sha256:abc".to_string(),
            repo_tags: vec!["nginx:1.25".to_string(), "nginx:latest".to_string()],
        };

        let record = ContainerImageRecord::derive(&web_container(), &image).unwrap();
        assert_eq!(record.container_name, "web-1");
        assert_eq!(record.image_id, "sha256:abc");
        assert_eq!(record.image_repo, "nginx:1.25");
        assert_eq!(record.label_values(), ["web-1", "sha256:abc", "nginx:1.25"]);
    }

    #[test]
    fn test_untagged_image_is_unknown() {
        let image = ImageDetails {
            id: "sha256:abc".to_string(),
            repo_tags: Vec::new(),
        };
        let record = ContainerImageRecord::derive(&web_container(), &image).unwrap();
        assert_eq!(record.image_repo, UNKNOWN_REPO);
    }

    #[test]
    fn test_nameless_container_has_no_record() {
        let container = ContainerEntry {
            names: Vec::new(),
            ..web_container()
        };
        assert!(ContainerImageRecord::derive(&container, &ImageDetails::default()).is_none());
    }
}
