use crate::domain::{Logger, Noun};
use anyhow::Result;

/// Writes the audit line for one attempted action on one resource.
///
/// `action` reads before the noun: "deleting", "removing role r from".
pub fn report(logger: &dyn Logger, action: &str, noun: Noun, name: &str, outcome: Result<()>) {
    let line = match outcome {
        Ok(()) => format!("SUCCESS {action} {} {name}\n", noun.singular),
        Err(cause) => format!("ERROR {action} {} {name}: {cause:#}\n", noun.singular),
    };
    logger.print(&line);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingLogger;
    use anyhow::anyhow;

    const PROFILE: Noun = Noun::new("instance profile", "instance profiles");

    #[test]
    fn test_report_success() {
        let logger = RecordingLogger::new(true);
        report(&logger, "deleting", PROFILE, "banana", Ok(()));
        assert_eq!(
            logger.messages(),
            vec!["SUCCESS deleting instance profile banana\n".to_string()]
        );
    }

    #[test]
    fn test_report_failure_includes_cause() {
        let logger = RecordingLogger::new(true);
        report(
            &logger,
            "removing role the-role from",
            PROFILE,
            "banana",
            Err(anyhow!("some error")),
        );
        assert_eq!(
            logger.messages(),
            vec![
                "ERROR removing role the-role from instance profile banana: some error\n"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_report_failure_renders_context_chain() {
        let logger = RecordingLogger::new(true);
        let cause = anyhow!("exit status 254").context("aws iam delete-role");
        report(&logger, "deleting", Noun::new("role", "roles"), "r", Err(cause));
        assert_eq!(
            logger.messages(),
            vec!["ERROR deleting role r: aws iam delete-role: exit status 254\n".to_string()]
        );
    }
}
