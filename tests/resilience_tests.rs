use anyhow::Result;
use leftovers::providers::aws::InstanceProfiles;
use leftovers::services::Leftovers;
use leftovers::test_support::{MockIam, MockKind, RecordingLogger};
use leftovers::{LeftoversError, ResourceKind};
use std::sync::Arc;

fn create_leftovers(proceed: bool) -> (Leftovers, Arc<MockIam>, Arc<RecordingLogger>) {
    let iam = Arc::new(MockIam::new());
    let logger = Arc::new(RecordingLogger::new(proceed));
    let kinds: Vec<Box<dyn ResourceKind>> =
        vec![Box::new(InstanceProfiles::new(iam.clone(), logger.clone()))];
    (Leftovers::new(logger.clone(), kinds), iam, logger)
}

#[test]
fn test_instance_profile_detach_then_delete() -> Result<()> {
    let (leftovers, iam, logger) = create_leftovers(true);
    iam.add_instance_profile("banana", &["the-role"]);

    leftovers.delete("")?;

    assert_eq!(
        logger.messages(),
        vec![
            "SUCCESS removing role the-role from instance profile banana\n".to_string(),
            "SUCCESS deleting instance profile banana\n".to_string(),
        ]
    );
    assert_eq!(iam.call_count("remove_role_from_instance_profile"), 1);
    assert_eq!(iam.call_count("delete_instance_profile"), 1);
    assert_eq!(
        iam.get_commands(),
        vec![
            "list_instance_profiles".to_string(),
            "remove_role_from_instance_profile:banana:the-role".to_string(),
            "delete_instance_profile:banana".to_string(),
        ]
    );

    Ok(())
}

#[test]
fn test_instance_profile_detach_failure_still_deletes() -> Result<()> {
    let (leftovers, iam, logger) = create_leftovers(true);
    iam.add_instance_profile("banana", &["the-role"]);
    iam.set_fail_on("remove_role_from_instance_profile", "some error");

    leftovers.delete("")?;

    assert_eq!(
        logger.messages(),
        vec![
            "ERROR removing role the-role from instance profile banana: some error\n".to_string(),
            "SUCCESS deleting instance profile banana\n".to_string(),
        ]
    );
    assert_eq!(iam.call_count("delete_instance_profile"), 1);

    Ok(())
}

#[test]
fn test_failed_role_removal_moves_on_to_the_next_role() -> Result<()> {
    let (leftovers, iam, logger) = create_leftovers(true);
    iam.add_instance_profile("banana", &["r1", "r2"]);
    iam.set_fail_on("remove_role_from_instance_profile:banana:r1", "boom");

    leftovers.delete("")?;

    assert_eq!(
        logger.messages(),
        vec![
            "ERROR removing role r1 from instance profile banana: boom\n".to_string(),
            "SUCCESS removing role r2 from instance profile banana\n".to_string(),
            "SUCCESS deleting instance profile banana\n".to_string(),
        ]
    );
    assert_eq!(
        iam.get_commands(),
        vec![
            "list_instance_profiles".to_string(),
            "remove_role_from_instance_profile:banana:r1".to_string(),
            "remove_role_from_instance_profile:banana:r2".to_string(),
            "delete_instance_profile:banana".to_string(),
        ]
    );

    Ok(())
}

#[test]
fn test_instance_profile_listing_failure_aborts_delete() {
    let (leftovers, iam, logger) = create_leftovers(true);
    iam.add_instance_profile("banana", &["the-role"]);
    iam.set_fail_on("list_instance_profiles", "listing error");

    let err = leftovers.delete("").unwrap_err();

    assert!(matches!(err, LeftoversError::Listing { .. }));
    assert_eq!(err.to_string(), "Listing instance profiles: listing error");
    assert_eq!(iam.call_count("delete_instance_profile"), 0);
    assert!(logger.prompts().is_empty());
}

#[test]
fn test_instance_profile_delete_failure_is_logged() -> Result<()> {
    let (leftovers, iam, logger) = create_leftovers(true);
    iam.add_instance_profile("banana", &[]);
    iam.set_fail_on("delete_instance_profile", "deleting error");

    leftovers.delete("")?;

    assert_eq!(
        logger.messages(),
        vec!["ERROR deleting instance profile banana: deleting error\n".to_string()]
    );

    Ok(())
}

#[test]
fn test_instance_profile_declined_prompt_touches_nothing() -> Result<()> {
    let (leftovers, iam, logger) = create_leftovers(false);
    iam.add_instance_profile("banana", &["the-role"]);

    leftovers.delete("")?;

    assert_eq!(
        logger.prompts(),
        vec!["Are you sure you want to delete instance profile banana?".to_string()]
    );
    assert_eq!(iam.call_count("remove_role_from_instance_profile"), 0);
    assert_eq!(iam.call_count("delete_instance_profile"), 0);
    assert!(logger.messages().is_empty());

    Ok(())
}

#[test]
fn test_failures_never_stop_later_resources_or_kinds() -> Result<()> {
    let logger = Arc::new(RecordingLogger::new(true));
    let volumes = Arc::new(MockKind::new("ec2-volume", "volume", "volumes"));
    let vpcs = Arc::new(MockKind::new("ec2-vpc", "vpc", "vpcs"));
    volumes.add("env-vol-1");
    volumes.add("env-vol-2");
    vpcs.add("env-vpc");
    volumes.set_fail_on("delete:env-vol-1", "volume in use");

    let leftovers = Leftovers::new(
        logger.clone(),
        vec![Box::new(volumes.clone()), Box::new(vpcs.clone())],
    );

    leftovers.delete("env")?;

    assert_eq!(
        logger.messages(),
        vec![
            "ERROR deleting volume env-vol-1: volume in use\n".to_string(),
            "SUCCESS deleting volume env-vol-2\n".to_string(),
            "SUCCESS deleting vpc env-vpc\n".to_string(),
        ]
    );
    assert_eq!(volumes.names(), vec!["env-vol-1".to_string()]);

    Ok(())
}

#[test]
fn test_listing_failure_in_dry_run_moves_on() {
    let logger = Arc::new(RecordingLogger::new(true));
    let broken = Arc::new(MockKind::new("iam-role", "role", "roles"));
    let healthy = Arc::new(MockKind::new("iam-policy", "policy", "policies"));
    broken.set_fail_on("list", "throttled");
    healthy.add("env-policy");

    let leftovers = Leftovers::new(
        logger.clone(),
        vec![Box::new(broken), Box::new(healthy)],
    );

    leftovers.list("");

    assert_eq!(
        logger.messages(),
        vec![
            "Listing roles: throttled\n".to_string(),
            "[policy: env-policy]\n".to_string(),
        ]
    );
}
