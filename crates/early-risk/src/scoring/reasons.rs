use super::rules::FlagSet;

/// Labels of triggered flags in rule order, joined with ", "; empty when none fire.
pub fn format_reasons(flags: &FlagSet) -> String {
    flags
        .triggered()
        .map(|flag| flag.label())
        .collect::<Vec<_>>()
        .join(", ")
}
