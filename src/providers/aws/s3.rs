use super::client::S3Client;
use crate::domain::{Filter, Noun, Resource, ResourceKind};
use anyhow::Result;
use std::sync::Arc;

/// S3 buckets, emptied and removed in one step.
pub struct Buckets {
    client: Arc<dyn S3Client>,
}

impl Buckets {
    pub fn new(client: Arc<dyn S3Client>) -> Self {
        Self { client }
    }
}

impl ResourceKind for Buckets {
    fn type_name(&self) -> &'static str {
        "s3-bucket"
    }

    fn noun(&self) -> Noun {
        Noun::new("bucket", "buckets")
    }

    fn list(&self, filter: &Filter) -> Result<Vec<Resource>> {
        Ok(self
            .client
            .list_buckets()?
            .into_iter()
            .filter(|name| filter.matches(name))
            .map(Resource::new)
            .collect())
    }

    fn delete(&self, resource: &Resource) -> Result<()> {
        self.client.delete_bucket(&resource.id)
    }
}
