use anyhow::Result;
use leftovers::providers::{aws, gcp, vsphere};
use leftovers::providers::gcp::client::Collection;
use leftovers::services::Leftovers;
use leftovers::test_support::{
    MockCompute, MockEc2, MockElb, MockIam, MockS3, MockVSphere, RecordingLogger,
};
use leftovers::LeftoversError;
use std::sync::Arc;

struct Aws {
    leftovers: Leftovers,
    iam: Arc<MockIam>,
    ec2: Arc<MockEc2>,
    elb: Arc<MockElb>,
    s3: Arc<MockS3>,
    logger: Arc<RecordingLogger>,
}

fn create_aws() -> Aws {
    let iam = Arc::new(MockIam::new());
    let ec2 = Arc::new(MockEc2::new());
    let elb = Arc::new(MockElb::new());
    let s3 = Arc::new(MockS3::new());
    let logger = Arc::new(RecordingLogger::new(true));

    let kinds = aws::kinds(
        iam.clone(),
        ec2.clone(),
        elb.clone(),
        s3.clone(),
        logger.clone(),
    );

    Aws {
        leftovers: Leftovers::new(logger.clone(), kinds),
        iam,
        ec2,
        elb,
        s3,
        logger,
    }
}

fn seed_environment(aws: &Aws) {
    aws.elb.add_load_balancer("env-cf-router");
    aws.ec2.add_instance("i-1", Some("env-bosh"), "running");
    aws.iam.add_instance_profile("env-profile", &["env-role"]);
    aws.iam.add_role("env-role", &[], &["env-inline"]);
    aws.ec2.add_volume("vol-env", "available");
    aws.ec2.add_vpc("vpc-1", Some("env-vpc"), false);
    aws.s3.add_bucket("env-blobs");
    aws.s3.add_bucket("other-team");
}

#[test]
fn test_aws_delete_walks_kinds_in_order() -> Result<()> {
    let aws = create_aws();
    seed_environment(&aws);

    aws.leftovers.delete("env")?;

    assert_eq!(
        aws.logger.prompts(),
        vec![
            "Are you sure you want to delete load balancer env-cf-router?".to_string(),
            "Are you sure you want to delete instance i-1 (Name:env-bosh)?".to_string(),
            "Are you sure you want to delete instance profile env-profile?".to_string(),
            "Are you sure you want to delete role env-role?".to_string(),
            "Are you sure you want to delete volume vol-env?".to_string(),
            "Are you sure you want to delete vpc vpc-1 (Name:env-vpc)?".to_string(),
            "Are you sure you want to delete bucket env-blobs?".to_string(),
        ]
    );
    assert_eq!(aws.s3.buckets(), vec!["other-team".to_string()]);
    assert!(aws.iam.roles().is_empty());
    assert!(aws.ec2.vpcs().is_empty());

    Ok(())
}

#[test]
fn test_aws_second_delete_finds_nothing() -> Result<()> {
    let aws = create_aws();
    seed_environment(&aws);

    aws.leftovers.delete("env")?;
    let prompts_after_first = aws.logger.prompts().len();

    aws.leftovers.delete("env")?;

    assert_eq!(aws.logger.prompts().len(), prompts_after_first);

    Ok(())
}

#[test]
fn test_aws_dry_run_only_lists() {
    let aws = create_aws();
    seed_environment(&aws);

    aws.leftovers.list("env");

    assert_eq!(
        aws.logger.messages(),
        vec![
            "[load balancer: env-cf-router]\n".to_string(),
            "[instance: i-1 (Name:env-bosh)]\n".to_string(),
            "[instance profile: env-profile]\n".to_string(),
            "[role: env-role]\n".to_string(),
            "[volume: vol-env]\n".to_string(),
            "[vpc: vpc-1 (Name:env-vpc)]\n".to_string(),
            "[bucket: env-blobs]\n".to_string(),
        ]
    );
    assert!(aws.logger.prompts().is_empty());
    assert_eq!(aws.s3.buckets().len(), 2);
}

#[test]
fn test_aws_delete_type_touches_one_kind() -> Result<()> {
    let aws = create_aws();
    seed_environment(&aws);

    aws.leftovers.delete_type("env", "s3-bucket")?;

    assert_eq!(aws.s3.buckets(), vec!["other-team".to_string()]);
    assert!(aws.iam.get_commands().is_empty());
    assert!(aws.ec2.get_commands().is_empty());

    Ok(())
}

#[test]
fn test_aws_delete_type_unknown_makes_no_calls() {
    let aws = create_aws();
    seed_environment(&aws);

    let err = aws.leftovers.delete_type("env", "ec2-elastic-ip").unwrap_err();

    assert!(matches!(err, LeftoversError::UnknownType(_)));
    assert!(aws.iam.get_commands().is_empty());
    assert!(aws.ec2.get_commands().is_empty());
    assert!(aws.elb.get_commands().is_empty());
    assert!(aws.s3.get_commands().is_empty());
}

#[test]
fn test_aws_listing_failure_stops_before_later_kinds() {
    let aws = create_aws();
    seed_environment(&aws);
    aws.ec2.set_fail_on("describe_instances", "RequestLimitExceeded");

    let err = aws.leftovers.delete("env").unwrap_err();

    assert_eq!(err.to_string(), "Listing instances: RequestLimitExceeded");
    assert_eq!(aws.elb.load_balancers(), Vec::<String>::new());
    assert_eq!(aws.iam.instance_profiles().len(), 1);
    assert_eq!(aws.s3.buckets().len(), 2);
}

#[test]
fn test_aws_types_prints_every_kind() {
    let aws = create_aws();

    aws.leftovers.types();

    let messages = aws.logger.messages();
    assert_eq!(messages.len(), 14);
    assert_eq!(messages[0], "elb-load-balancer\n");
    assert_eq!(messages[13], "s3-bucket\n");
}

#[test]
fn test_gcp_load_balancer_torn_down_front_to_back() -> Result<()> {
    let compute = Arc::new(MockCompute::new());
    let logger = Arc::new(RecordingLogger::new(true));
    let leftovers = Leftovers::new(logger.clone(), gcp::kinds(compute.clone(), logger.clone()));

    compute.add(Collection::HttpHealthChecks, "env-health", None);
    compute.add(Collection::BackendServices, "env-backend", None);
    compute.add(Collection::UrlMaps, "env-urls", None);
    compute.add(Collection::TargetHttpProxies, "env-proxy", None);
    compute.add(Collection::GlobalForwardingRules, "env-https", None);
    compute.add_network("env-network");
    compute.add_subnetwork("env-network", "env-subnet", "us-east1");

    leftovers.delete("env")?;

    let deletes: Vec<String> = compute
        .get_commands()
        .into_iter()
        .filter(|command| command.starts_with("delete"))
        .collect();

    assert_eq!(
        deletes,
        vec![
            "delete:global-forwarding-rule:env-https".to_string(),
            "delete:target-http-proxy:env-proxy".to_string(),
            "delete:url-map:env-urls".to_string(),
            "delete:backend-service:env-backend".to_string(),
            "delete:http-health-check:env-health".to_string(),
            "delete_subnetwork:env-subnet:us-east1".to_string(),
            "delete_network:env-network".to_string(),
        ]
    );
    assert_eq!(
        logger.messages().last().map(String::as_str),
        Some("SUCCESS deleting network env-network\n")
    );

    Ok(())
}

#[test]
fn test_vsphere_folder_emptied_by_vm_pass_is_removed() -> Result<()> {
    let vsphere = Arc::new(MockVSphere::new());
    let logger = Arc::new(RecordingLogger::new(true));
    let leftovers = Leftovers::new(
        logger.clone(),
        vsphere::kinds(vsphere.clone(), logger.clone()),
    );

    vsphere.add_virtual_machine("/dc1/vm/env/bosh-0", true);
    vsphere.add_folder("/dc1/vm/env", 0);

    leftovers.delete("env")?;

    assert_eq!(
        logger.messages(),
        vec![
            "SUCCESS powering off virtual machine /dc1/vm/env/bosh-0\n".to_string(),
            "SUCCESS deleting virtual machine /dc1/vm/env/bosh-0\n".to_string(),
            "SUCCESS deleting folder /dc1/vm/env\n".to_string(),
        ]
    );
    assert!(vsphere.virtual_machines().is_empty());
    assert!(vsphere.folders().is_empty());

    Ok(())
}
