use std::num::NonZeroUsize;
use std::time::Duration;

use clap::Parser;
use vidlookup::flow::{FlowConfig, ValidationPolicy};

#[derive(Parser, Debug)]
#[command(version)]
/// Look up the download formats of a video URL
pub(crate) struct Args {
    /// How strictly the URL is checked before the lookup: strict, non-empty
    #[arg(long, value_parser = parse_policy, default_value = "strict", value_name = "POLICY")]
    pub(crate) policy: ValidationPolicy,

    /// Simulated lookup latency
    #[arg(long, default_value_t = 1500, value_name = "MILLISECONDS")]
    pub(crate) delay_ms: u64,

    /// How long the download notice stays visible
    #[arg(long, default_value_t = 5, value_name = "SECONDS")]
    pub(crate) notice_secs: u64,

    /// Open the given format after a successful lookup
    #[arg(short, long, value_name = "NUMBER")]
    pub(crate) select: Option<NonZeroUsize>,

    /// Print the link instead of opening it
    #[arg(long)]
    pub(crate) dry_run: bool,

    /// Print pages as JSON lines
    #[arg(long)]
    pub(crate) json: bool,

    /// Enable debug mode
    #[arg(short, long)]
    pub(crate) debug: bool,

    /// Video URL; read one per line from stdin if omitted
    pub(crate) url: Option<String>,
}

impl Args {
    pub(crate) fn flow_config(&self) -> FlowConfig {
        FlowConfig {
            policy: self.policy,
            notice_duration: Duration::from_secs(self.notice_secs),
        }
    }

    pub(crate) fn lookup_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

fn parse_policy(input: &str) -> Result<ValidationPolicy, String> {
    let normalized = input.replace('_', "-");

    for policy in enum_iterator::all::<ValidationPolicy>() {
        if normalized.eq_ignore_ascii_case(policy.get_name()) {
            return Ok(policy);
        }
    }

    let names = enum_iterator::all::<ValidationPolicy>()
        .map(|policy| policy.get_name())
        .collect::<Vec<_>>()
        .join(", ");

    Err(format!("unknown validation policy \"{input}\", expected one of: {names}"))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::{CommandFactory, Parser};
    use vidlookup::flow::ValidationPolicy;

    use super::{parse_policy, Args};

    #[test]
    fn test_command() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["vidlookup", "https://www.youtube.com/watch?v=dQw4w9WgXcQ"]).unwrap();
        assert_eq!(args.policy, ValidationPolicy::Strict);
        assert_eq!(args.lookup_delay(), Duration::from_millis(1500));
        assert_eq!(args.flow_config().notice_duration, Duration::from_secs(5));
        assert_eq!(args.select, None);
        assert_eq!(args.url.as_deref(), Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
    }

    #[test]
    fn test_options() {
        let args = Args::try_parse_from([
            "vidlookup",
            "--policy",
            "NON_EMPTY",
            "--delay-ms",
            "0",
            "-s",
            "2",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(args.policy, ValidationPolicy::NonEmpty);
        assert_eq!(args.lookup_delay(), Duration::ZERO);
        assert_eq!(args.select.map(|n| n.get()), Some(2));
        assert!(args.dry_run);
        assert_eq!(args.url, None);

        assert!(Args::try_parse_from(["vidlookup", "-s", "0", "x"]).is_err());
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!(parse_policy("strict"), Ok(ValidationPolicy::Strict));
        assert_eq!(parse_policy("Non-Empty"), Ok(ValidationPolicy::NonEmpty));
        assert!(parse_policy("lenient").unwrap_err().contains("strict, non-empty"));
    }
}
