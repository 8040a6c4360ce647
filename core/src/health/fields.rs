//! Field extraction rules: ordered line triggers plus token strategies.
//!
//! Each output field is governed by one [`FieldRule`] — an ordered list
//! of (trigger, strategy) arms. Different hardware families emit
//! structurally different lines for the same physical concept, so a
//! field may carry several arms; supporting a new family means appending
//! an arm, not editing control flow. Power supply is the one exception:
//! a chassis can report multiple supplies, so its rule aggregates across
//! all matching families instead of stopping at the first hit.

use super::corpus::Corpus;

/// How a rule decides that a corpus line belongs to its field.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Trigger {
    /// Line contains the literal substring.
    Contains(&'static str),
    /// Line contains the substring, ignoring ASCII case. The needle
    /// must be lowercase.
    ContainsNoCase(&'static str),
    /// Line starts with the literal prefix.
    Prefix(&'static str),
    /// Line contains `PS` immediately followed by an ASCII digit
    /// (`PS1`, `PS2`, ...).
    PsNumbered,
}

impl Trigger {
    fn matches(self, line: &str) -> bool {
        match self {
            Trigger::Contains(needle) => line.contains(needle),
            Trigger::ContainsNoCase(needle) => line.to_ascii_lowercase().contains(needle),
            Trigger::Prefix(prefix) => line.starts_with(prefix),
            Trigger::PsNumbered => has_numbered_supply(line),
        }
    }
}

/// How the field value is derived from a matching line.
///
/// Strategies are fallible: a line that matches a trigger but lacks the
/// expected token shape yields nothing, and scanning continues.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Strategy {
    /// Last whitespace-delimited token.
    LastToken,
    /// Second whitespace-delimited token.
    SecondToken,
    /// Third-from-last whitespace-delimited token.
    ThirdFromLastToken,
    /// First comma-separated segment containing `Version`, trimmed.
    VersionSegment,
    /// Substring after the final `is`, trimmed.
    AfterFinalIs,
}

impl Strategy {
    fn apply(self, line: &str) -> Option<String> {
        match self {
            Strategy::LastToken => last_token(line),
            Strategy::SecondToken => line
                .split_whitespace()
                .nth(1)
                .map(|token| token.to_string()),
            Strategy::ThirdFromLastToken => {
                let tokens: Vec<&str> = line.split_whitespace().collect();
                tokens
                    .len()
                    .checked_sub(3)
                    .map(|idx| tokens[idx].to_string())
            }
            Strategy::VersionSegment => line
                .split(',')
                .find(|segment| segment.contains("Version"))
                .map(|segment| segment.trim().to_string()),
            Strategy::AfterFinalIs => line
                .rfind("is")
                .map(|idx| line[idx + 2..].trim().to_string())
                .filter(|value| !value.is_empty()),
        }
    }
}

/// One field's ordered rule: (trigger, strategy) arms tried in priority
/// order on every line, lines in corpus order. The first arm that both
/// matches and extracts wins the field.
pub(crate) struct FieldRule {
    arms: &'static [(Trigger, Strategy)],
}

impl FieldRule {
    pub(crate) fn scan(&self, corpus: &Corpus) -> Option<String> {
        corpus.lines().find_map(|line| {
            self.arms.iter().find_map(|(trigger, strategy)| {
                if trigger.matches(line) {
                    strategy.apply(line)
                } else {
                    None
                }
            })
        })
    }
}

pub(crate) const HOSTNAME: FieldRule = FieldRule {
    arms: &[(Trigger::Contains("hostname"), Strategy::LastToken)],
};

pub(crate) const MODEL: FieldRule = FieldRule {
    arms: &[
        (Trigger::Prefix("cisco WS-"), Strategy::SecondToken),
        (Trigger::Contains("Cisco WS-"), Strategy::SecondToken),
    ],
};

pub(crate) const OS_VERSION: FieldRule = FieldRule {
    arms: &[(Trigger::Contains("IOS"), Strategy::VersionSegment)],
};

pub(crate) const UPTIME: FieldRule = FieldRule {
    arms: &[(Trigger::ContainsNoCase("uptime"), Strategy::AfterFinalIs)],
};

pub(crate) const FAN: FieldRule = FieldRule {
    arms: &[
        (Trigger::Contains("Fantray"), Strategy::LastToken),
        (Trigger::Contains("FAN"), Strategy::LastToken),
    ],
};

pub(crate) const TEMPERATURE: FieldRule = FieldRule {
    arms: &[
        (Trigger::Contains("TEMPERATURE"), Strategy::LastToken),
        (
            Trigger::Contains("Chassis Temperature"),
            Strategy::ThirdFromLastToken,
        ),
    ],
};

/// Power-supply line markers, in family priority order.
const POWER_FAMILIES: [Trigger; 3] = [
    Trigger::Contains("POWER"),
    Trigger::Contains("Built-in"),
    Trigger::PsNumbered,
];

/// Aggregate power-supply status across all matching families.
///
/// Every marker line is collected in corpus order with whitespace
/// collapsed; each family's sub-extraction then runs in priority order
/// and the resulting fragments are joined once with single spaces.
/// Returns nothing when no line matches, or when every matching line is
/// malformed.
pub(crate) fn power_supply(corpus: &Corpus) -> Option<String> {
    let hits: Vec<String> = corpus
        .lines()
        .filter(|line| POWER_FAMILIES.iter().any(|trigger| trigger.matches(line)))
        .map(collapse_whitespace)
        .collect();
    if hits.is_empty() {
        return None;
    }

    let mut fragments = Vec::new();
    for line in hits.iter().filter(|line| line.contains("POWER")) {
        if let Some(status) = last_token(line) {
            fragments.push(status);
        }
    }
    for line in hits.iter().filter(|line| line.contains("Built-in")) {
        if let Some(status) = last_token(line) {
            fragments.push(status);
        }
    }
    for line in hits.iter().filter(|line| has_numbered_supply(line)) {
        if let Some(fragment) = numbered_supply_fragment(line) {
            fragments.push(fragment);
        }
    }

    if fragments.is_empty() {
        None
    } else {
        Some(fragments.join(" "))
    }
}

/// `"<id>: <status>, <presence>"` from a numbered supply line like
/// `PS1 PWR-C45-1400AC OK present on` — id first, then the third- and
/// second-from-last tokens.
fn numbered_supply_fragment(line: &str) -> Option<String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 4 {
        return None;
    }
    let id = tokens[0];
    let status = tokens[tokens.len() - 3];
    let presence = tokens[tokens.len() - 2];
    Some(format!("{id}: {status}, {presence}"))
}

fn has_numbered_supply(line: &str) -> bool {
    line.match_indices("PS").any(|(idx, _)| {
        line[idx + 2..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit())
    })
}

fn last_token(line: &str) -> Option<String> {
    line.split_whitespace()
        .last()
        .map(|token| token.trim_end_matches('\r').to_string())
}

fn collapse_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::types::CommandOutputs;

    fn corpus_of(text: &str) -> Corpus {
        let outputs =
            CommandOutputs::from_pairs(vec![("show all".into(), Some(text.to_string()))]);
        Corpus::assemble(&outputs)
    }

    #[test]
    fn hostname_takes_last_token() {
        let corpus = corpus_of("Building configuration...\nhostname SW-CORE-1");
        assert_eq!(HOSTNAME.scan(&corpus).as_deref(), Some("SW-CORE-1"));
    }

    #[test]
    fn model_from_hardware_prefix() {
        let corpus = corpus_of("cisco WS-C3750G-24TS-1U (PowerPC405) processor");
        assert_eq!(MODEL.scan(&corpus).as_deref(), Some("WS-C3750G-24TS-1U"));
    }

    #[test]
    fn model_matches_capitalized_family_marker() {
        let corpus = corpus_of("Cisco WS-C2950T-24 (RC32300) processor with 20815872 bytes");
        assert_eq!(MODEL.scan(&corpus).as_deref(), Some("WS-C2950T-24"));
    }

    #[test]
    fn model_other_vendors_unmatched() {
        let corpus = corpus_of("Juniper EX4300-48T chassis");
        assert_eq!(MODEL.scan(&corpus), None);
    }

    #[test]
    fn os_version_takes_version_segment() {
        let corpus = corpus_of(
            "Cisco IOS Software, C3750 Software (C3750-IPBASEK9-M), Version 12.2(55)SE12, RELEASE SOFTWARE (fc2)",
        );
        assert_eq!(
            OS_VERSION.scan(&corpus).as_deref(),
            Some("Version 12.2(55)SE12")
        );
    }

    #[test]
    fn os_version_skips_ios_line_without_version() {
        let corpus = corpus_of("IOS image file is flash:c3750.bin\nCisco IOS Software, Version 15.0(2)SE");
        assert_eq!(
            OS_VERSION.scan(&corpus).as_deref(),
            Some("Version 15.0(2)SE")
        );
    }

    #[test]
    fn uptime_takes_text_after_final_is() {
        let corpus = corpus_of("SW-CORE-1 uptime is 5 weeks, 4 days, 2 hours");
        assert_eq!(
            UPTIME.scan(&corpus).as_deref(),
            Some("5 weeks, 4 days, 2 hours")
        );
    }

    #[test]
    fn uptime_trigger_is_case_insensitive() {
        let corpus = corpus_of("System Uptime is 12 hours");
        assert_eq!(UPTIME.scan(&corpus).as_deref(), Some("12 hours"));
    }

    #[test]
    fn fan_prefers_fantray_family() {
        let corpus = corpus_of("Fantray status: good");
        assert_eq!(FAN.scan(&corpus).as_deref(), Some("good"));
    }

    #[test]
    fn fan_matches_uppercase_family() {
        let corpus = corpus_of("FAN is OK");
        assert_eq!(FAN.scan(&corpus).as_deref(), Some("OK"));
    }

    #[test]
    fn temperature_uppercase_family_takes_last_token() {
        let corpus = corpus_of("TEMPERATURE is OK");
        assert_eq!(TEMPERATURE.scan(&corpus).as_deref(), Some("OK"));
    }

    #[test]
    fn temperature_chassis_family_takes_third_from_last() {
        // "show env" on the older family reports a reading like
        // "Chassis Temperature = 33 degrees Celsius".
        let corpus = corpus_of("Chassis Temperature = 33 degrees Celsius");
        assert_eq!(TEMPERATURE.scan(&corpus).as_deref(), Some("33"));
    }

    #[test]
    fn first_matching_line_wins() {
        let corpus = corpus_of("hostname FIRST\nhostname SECOND");
        assert_eq!(HOSTNAME.scan(&corpus).as_deref(), Some("FIRST"));
    }

    #[test]
    fn malformed_line_falls_through_to_later_match() {
        // The first marker line has no second token; the rule must keep
        // scanning instead of giving up or panicking.
        let corpus = corpus_of("cisco WS-\ncisco WS-C2950T-24 processor");
        assert_eq!(MODEL.scan(&corpus).as_deref(), Some("WS-C2950T-24"));
    }

    #[test]
    fn no_match_yields_none() {
        let corpus = corpus_of("nothing relevant here");
        assert_eq!(HOSTNAME.scan(&corpus), None);
        assert_eq!(MODEL.scan(&corpus), None);
        assert_eq!(OS_VERSION.scan(&corpus), None);
        assert_eq!(UPTIME.scan(&corpus), None);
        assert_eq!(FAN.scan(&corpus), None);
        assert_eq!(TEMPERATURE.scan(&corpus), None);
        assert_eq!(power_supply(&corpus), None);
    }

    // ── Power supply aggregation ────────────────────────────────────

    #[test]
    fn power_supply_single_family() {
        let corpus = corpus_of("Internal POWER supply is OK");
        assert_eq!(power_supply(&corpus).as_deref(), Some("OK"));
    }

    #[test]
    fn power_supply_built_in_family() {
        let corpus = corpus_of("Built-in power supply OK");
        assert_eq!(power_supply(&corpus).as_deref(), Some("OK"));
    }

    #[test]
    fn power_supply_numbered_family_composes_fragment() {
        let corpus = corpus_of("PS1 PWR-C45-1400AC OK present on");
        assert_eq!(power_supply(&corpus).as_deref(), Some("PS1: OK, present"));
    }

    #[test]
    fn power_supply_aggregates_across_families() {
        let corpus = corpus_of(
            "Built-in power supply OK\nPS1 PWR-C45-1400AC OK present on\nPS2 PWR-C45-1400AC failed present on",
        );
        assert_eq!(
            power_supply(&corpus).as_deref(),
            Some("OK PS1: OK, present PS2: failed, present")
        );
    }

    #[test]
    fn power_supply_collapses_repeated_whitespace() {
        let corpus = corpus_of("PS1   PWR-C45-1400AC    OK   present   on");
        assert_eq!(power_supply(&corpus).as_deref(), Some("PS1: OK, present"));
    }

    #[test]
    fn power_supply_all_malformed_yields_none() {
        // A numbered marker with too few tokens cannot be composed.
        let corpus = corpus_of("PS1 on");
        assert_eq!(power_supply(&corpus), None);
    }

    #[test]
    fn ps_marker_requires_digit() {
        let corpus = corpus_of("PSU status nominal here");
        assert_eq!(power_supply(&corpus), None);
    }
}
