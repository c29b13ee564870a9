// Command abbreviation matching for the Crawlboard CLI

/// Find all commands that start with the given prefix (case-insensitive)
pub fn find_matching_commands<'a>(prefix: &str, commands: &'a [&str]) -> Vec<&'a str> {
    let prefix_lower = prefix.to_lowercase();
    commands.iter()
        .filter(|cmd| cmd.to_lowercase().starts_with(&prefix_lower))
        .copied()
        .collect()
}

/// Find a unique command match for the given prefix
/// Returns Ok(command) if exactly one match, Err(matches) if ambiguous, Err(empty) if no match
/// Note: Exact matches take precedence over prefix matches
pub fn find_unique_command<'a>(prefix: &str, commands: &'a [&str]) -> Result<&'a str, Vec<&'a str>> {
    let prefix_lower = prefix.to_lowercase();
    if let Some(cmd) = commands.iter().find(|cmd| cmd.to_lowercase() == prefix_lower) {
        return Ok(*cmd);
    }

    let matches = find_matching_commands(prefix, commands);
    if matches.len() == 1 {
        Ok(matches[0])
    } else {
        Err(matches)
    }
}

/// Top-level commands
pub const TOP_LEVEL_COMMANDS: &[&str] = &[
    "add", "list", "show", "set-status", "modify", "delete", "dashboard", "catalog",
];

/// Expand an abbreviated first argument to its full command name.
/// Flags, numbers and unknown words pass through for clap to report.
pub fn expand_command_abbreviations(mut args: Vec<String>) -> Result<Vec<String>, String> {
    let Some(first) = args.first() else {
        return Ok(args);
    };
    if first.starts_with('-') || first.parse::<i64>().is_ok() || first == "help" {
        return Ok(args);
    }

    match find_unique_command(first, TOP_LEVEL_COMMANDS) {
        Ok(full_cmd) => {
            args[0] = full_cmd.to_string();
            Ok(args)
        }
        Err(matches) if matches.is_empty() => Ok(args),
        Err(matches) => Err(format!(
            "Ambiguous command '{}'. Did you mean one of: {}?",
            first,
            matches.join(", ")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_find_unique_command() {
        assert_eq!(find_unique_command("dash", TOP_LEVEL_COMMANDS), Ok("dashboard"));
        assert_eq!(find_unique_command("SET", TOP_LEVEL_COMMANDS), Ok("set-status"));
        assert_eq!(find_unique_command("x", TOP_LEVEL_COMMANDS), Err(vec![]));
        assert_eq!(find_unique_command("d", TOP_LEVEL_COMMANDS), Err(vec!["delete", "dashboard"]));
    }

    #[test]
    fn test_expand_first_argument_only() {
        assert_eq!(
            expand_command_abbreviations(args(&["da", "2024-01-01"])).unwrap(),
            args(&["dashboard", "2024-01-01"])
        );
        assert_eq!(
            expand_command_abbreviations(args(&["set", "3", "open"])).unwrap(),
            args(&["set-status", "3", "open"])
        );
        assert_eq!(
            expand_command_abbreviations(args(&["--help"])).unwrap(),
            args(&["--help"])
        );
        assert!(expand_command_abbreviations(args(&["d"])).is_err());
        assert!(expand_command_abbreviations(vec![]).unwrap().is_empty());
    }
}
