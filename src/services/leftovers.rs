use crate::domain::{Filter, LeftoversError, Logger, ResourceKind};
use crate::services::report;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Drives listing, confirmation and deletion across every registered
/// resource kind of one provider.
///
/// Kinds are processed one at a time in registration order, which is the
/// provider's hand-written deletion order. Nothing is remembered between
/// calls: every pass lists the provider again.
pub struct Leftovers {
    logger: Arc<dyn Logger>,
    kinds: Vec<Box<dyn ResourceKind>>,
}

impl Leftovers {
    pub fn new(logger: Arc<dyn Logger>, kinds: Vec<Box<dyn ResourceKind>>) -> Self {
        Self { logger, kinds }
    }

    pub fn type_names(&self) -> Vec<&'static str> {
        self.kinds.iter().map(|kind| kind.type_name()).collect()
    }

    /// Prints every registered type, one per line, without calling the provider
    pub fn types(&self) {
        for kind in &self.kinds {
            self.logger.print(&format!("{}\n", kind.type_name()));
        }
    }

    /// Prints every matching resource. A kind whose listing fails is reported
    /// and skipped; listing never stops early.
    pub fn list(&self, filter: &str) {
        let filter = Filter::new(filter);
        info!(filter = %filter, kinds = self.kinds.len(), "Listing leftovers");

        for kind in &self.kinds {
            let noun = kind.noun();

            match kind.list(&filter) {
                Ok(resources) => {
                    debug!(kind = kind.type_name(), count = resources.len(), "Listed");

                    for resource in resources {
                        self.logger
                            .print(&format!("[{}: {}]\n", noun.singular, resource.name));
                    }
                }

                Err(cause) => {
                    let err = LeftoversError::listing(noun, cause);
                    warn!(kind = kind.type_name(), error = %err, "Listing failed");
                    self.logger.print(&format!("{err}\n"));
                }
            }
        }
    }

    /// Deletes every confirmed, matching resource of every kind.
    ///
    /// Returns an error only when a kind cannot be listed; per-resource
    /// failures are logged and the run carries on.
    pub fn delete(&self, filter: &str) -> Result<(), LeftoversError> {
        let filter = Filter::new(filter);
        info!(filter = %filter, kinds = self.kinds.len(), "Deleting leftovers");

        for kind in &self.kinds {
            self.sweep(kind.as_ref(), &filter)?;
        }

        Ok(())
    }

    /// Same as `delete`, restricted to the kind registered as `type_name`.
    pub fn delete_type(&self, filter: &str, type_name: &str) -> Result<(), LeftoversError> {
        let kind = self
            .kinds
            .iter()
            .find(|kind| kind.type_name() == type_name)
            .ok_or_else(|| LeftoversError::UnknownType(type_name.to_string()))?;

        let filter = Filter::new(filter);
        info!(filter = %filter, kind = type_name, "Deleting leftovers of one type");

        self.sweep(kind.as_ref(), &filter)
    }

    fn sweep(&self, kind: &dyn ResourceKind, filter: &Filter) -> Result<(), LeftoversError> {
        let noun = kind.noun();
        let resources = kind
            .list(filter)
            .map_err(|cause| LeftoversError::listing(noun, cause))?;

        debug!(kind = kind.type_name(), count = resources.len(), "Listed");

        for resource in resources {
            let question = format!(
                "Are you sure you want to delete {} {}?",
                noun.singular, resource.name
            );

            if !self.logger.prompt(&question) {
                debug!(kind = kind.type_name(), resource = %resource.name, "Skipped");
                continue;
            }

            report(
                self.logger.as_ref(),
                "deleting",
                noun,
                &resource.name,
                kind.delete(&resource),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockKind, RecordingLogger};

    fn create_leftovers(
        kinds: Vec<Arc<MockKind>>,
        proceed: bool,
    ) -> (Leftovers, Arc<RecordingLogger>) {
        let logger = Arc::new(RecordingLogger::new(proceed));
        let boxed = kinds
            .into_iter()
            .map(|kind| Box::new(kind) as Box<dyn ResourceKind>)
            .collect();
        (Leftovers::new(logger.clone(), boxed), logger)
    }

    #[test]
    fn test_types_prints_in_registration_order() {
        let first = Arc::new(MockKind::new("ec2-instance", "instance", "instances"));
        let second = Arc::new(MockKind::new("ec2-vpc", "vpc", "vpcs"));
        let (leftovers, logger) = create_leftovers(vec![first.clone(), second.clone()], true);

        leftovers.types();

        assert_eq!(
            logger.messages(),
            vec!["ec2-instance\n".to_string(), "ec2-vpc\n".to_string()]
        );
        assert!(first.get_commands().is_empty());
        assert!(second.get_commands().is_empty());
    }

    #[test]
    fn test_list_prints_matches_only() {
        let kind = Arc::new(MockKind::new("ec2-volume", "volume", "volumes"));
        kind.add("vol-env-1");
        kind.add("vol-other");
        kind.add("vol-env-1-data");
        let (leftovers, logger) = create_leftovers(vec![kind.clone()], true);

        leftovers.list("env-1");

        assert_eq!(
            logger.messages(),
            vec![
                "[volume: vol-env-1]\n".to_string(),
                "[volume: vol-env-1-data]\n".to_string(),
            ]
        );
        assert!(logger.prompts().is_empty());
        assert_eq!(kind.call_count("delete"), 0);
    }

    #[test]
    fn test_list_continues_after_listing_failure() {
        let broken = Arc::new(MockKind::new("iam-role", "role", "roles"));
        broken.set_fail_on("list", "access denied");
        let healthy = Arc::new(MockKind::new("iam-policy", "policy", "policies"));
        healthy.add("env-policy");
        let (leftovers, logger) = create_leftovers(vec![broken, healthy], true);

        leftovers.list("");

        assert_eq!(
            logger.messages(),
            vec![
                "Listing roles: access denied\n".to_string(),
                "[policy: env-policy]\n".to_string(),
            ]
        );
    }

    #[test]
    fn test_delete_prompts_then_deletes_each_resource() {
        let kind = Arc::new(MockKind::new("ec2-key-pair", "key pair", "key pairs"));
        kind.add("env-key-1");
        kind.add("env-key-2");
        let (leftovers, logger) = create_leftovers(vec![kind.clone()], true);

        leftovers.delete("env").unwrap();

        assert_eq!(
            logger.prompts(),
            vec![
                "Are you sure you want to delete key pair env-key-1?".to_string(),
                "Are you sure you want to delete key pair env-key-2?".to_string(),
            ]
        );
        assert_eq!(
            logger.messages(),
            vec![
                "SUCCESS deleting key pair env-key-1\n".to_string(),
                "SUCCESS deleting key pair env-key-2\n".to_string(),
            ]
        );
        assert_eq!(
            kind.get_commands(),
            vec![
                "list".to_string(),
                "delete:env-key-1".to_string(),
                "delete:env-key-2".to_string(),
            ]
        );
    }

    #[test]
    fn test_delete_declined_prompt_is_a_skip() {
        let kind = Arc::new(MockKind::new("ec2-key-pair", "key pair", "key pairs"));
        kind.add("env-key");
        let (leftovers, logger) = create_leftovers(vec![kind.clone()], false);

        let result = leftovers.delete("env");

        assert!(result.is_ok());
        assert_eq!(kind.call_count("delete"), 0);
        assert!(logger.messages().is_empty());
    }

    #[test]
    fn test_delete_only_skips_declined_resources() {
        let kind = Arc::new(MockKind::new("ec2-key-pair", "key pair", "key pairs"));
        kind.add("env-keep");
        kind.add("env-drop");
        let (leftovers, logger) = create_leftovers(vec![kind.clone()], true);
        logger.decline_containing("env-keep");

        leftovers.delete("env").unwrap();

        assert_eq!(kind.get_commands(), vec!["list", "delete:env-drop"]);
        assert_eq!(kind.names(), vec!["env-keep".to_string()]);
    }

    #[test]
    fn test_delete_continues_on_individual_failures() {
        let first = Arc::new(MockKind::new("ec2-volume", "volume", "volumes"));
        first.add("vol-1");
        first.add("vol-2");
        first.set_fail_on("delete:vol-1", "volume is in use");
        let second = Arc::new(MockKind::new("ec2-vpc", "vpc", "vpcs"));
        second.add("vpc-1");
        let (leftovers, logger) = create_leftovers(vec![first.clone(), second.clone()], true);

        let result = leftovers.delete("");

        assert!(result.is_ok());
        assert_eq!(
            logger.messages(),
            vec![
                "ERROR deleting volume vol-1: volume is in use\n".to_string(),
                "SUCCESS deleting volume vol-2\n".to_string(),
                "SUCCESS deleting vpc vpc-1\n".to_string(),
            ]
        );
        assert_eq!(second.call_count("delete"), 1);
    }

    #[test]
    fn test_delete_returns_listing_error_and_stops() {
        let broken = Arc::new(MockKind::new("iam-role", "role", "roles"));
        broken.set_fail_on("list", "listing error");
        let later = Arc::new(MockKind::new("iam-policy", "policy", "policies"));
        later.add("policy");
        let (leftovers, logger) = create_leftovers(vec![broken, later.clone()], true);

        let err = leftovers.delete("").unwrap_err();

        assert_eq!(err.to_string(), "Listing roles: listing error");
        assert!(later.get_commands().is_empty());
        assert!(logger.prompts().is_empty());
    }

    #[test]
    fn test_delete_processes_kinds_in_registration_order() {
        let instances = Arc::new(MockKind::new("ec2-instance", "instance", "instances"));
        instances.add("i-1");
        let vpcs = Arc::new(MockKind::new("ec2-vpc", "vpc", "vpcs"));
        vpcs.add("vpc-1");
        let (leftovers, logger) = create_leftovers(vec![instances, vpcs], true);

        leftovers.delete("").unwrap();

        assert_eq!(
            logger.prompts(),
            vec![
                "Are you sure you want to delete instance i-1?".to_string(),
                "Are you sure you want to delete vpc vpc-1?".to_string(),
            ]
        );
    }

    #[test]
    fn test_delete_type_only_touches_named_kind() {
        let instances = Arc::new(MockKind::new("ec2-instance", "instance", "instances"));
        instances.add("i-1");
        let vpcs = Arc::new(MockKind::new("ec2-vpc", "vpc", "vpcs"));
        vpcs.add("vpc-1");
        let (leftovers, logger) = create_leftovers(vec![instances.clone(), vpcs.clone()], true);

        leftovers.delete_type("", "ec2-vpc").unwrap();

        assert!(instances.get_commands().is_empty());
        assert_eq!(vpcs.call_count("delete"), 1);
        assert_eq!(logger.messages(), vec!["SUCCESS deleting vpc vpc-1\n".to_string()]);
    }

    #[test]
    fn test_delete_type_unknown_type_does_no_io() {
        let instances = Arc::new(MockKind::new("ec2-instance", "instance", "instances"));
        instances.add("i-1");
        let (leftovers, logger) = create_leftovers(vec![instances.clone()], true);

        let err = leftovers.delete_type("", "bananas").unwrap_err();

        assert!(matches!(err, LeftoversError::UnknownType(ref name) if name == "bananas"));
        assert!(instances.get_commands().is_empty());
        assert!(logger.messages().is_empty());
    }

    #[test]
    fn test_delete_twice_is_idempotent() {
        let kind = Arc::new(MockKind::new("ec2-subnet", "subnet", "subnets"));
        kind.add("subnet-env");
        let (leftovers, logger) = create_leftovers(vec![kind.clone()], true);

        leftovers.delete("env").unwrap();
        leftovers.delete("env").unwrap();

        assert_eq!(logger.prompts().len(), 1);
        assert_eq!(kind.call_count("list"), 2);
        assert_eq!(kind.call_count("delete"), 1);
    }

    #[test]
    fn test_type_names() {
        let instances = Arc::new(MockKind::new("ec2-instance", "instance", "instances"));
        let vpcs = Arc::new(MockKind::new("ec2-vpc", "vpc", "vpcs"));
        let (leftovers, _logger) = create_leftovers(vec![instances, vpcs], true);

        assert_eq!(leftovers.type_names(), vec!["ec2-instance", "ec2-vpc"]);
    }
}
