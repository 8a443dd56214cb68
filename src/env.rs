use toml::Value;

/// Collect settings overrides from environment variables named `{PREFIX}_*`.
///
/// The remainder after the prefix becomes the key: `__` separates nesting
/// levels, single `_` is part of the field name, and segments are lowercased.
/// `DRUPAL_CONFIG_PROVIDER_PATH` maps to `provider_path`,
/// `DRUPAL_CONFIG_LOG__LEVEL` to `log.level`.
///
/// Empty values are treated as unset.
///
/// Values are returned as given; [`parse_env_value`] types them.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
pub fn env_to_pairs(
    prefix: &str,
    vars: impl IntoIterator<Item = (String, String)>,
) -> Vec<(String, String)> {
    let needle = format!("{prefix}_");
    let mut pairs = Vec::new();

    for (key, value) in vars {
        let Some(rest) = key.strip_prefix(&needle) else {
            continue;
        };
        if rest.is_empty() || value.is_empty() {
            continue;
        }

        let dotted = rest
            .split("__")
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(".");
        pairs.push((dotted, value));
    }

    pairs
}

/// Parse an env var value into a typed TOML value.
/// Tries: bool → integer → float → string.
pub(crate) fn parse_env_value(s: &str) -> Value {
    if s.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    // Require a dot so "NaN" and "inf" stay strings.
    if s.contains('.')
        && let Ok(f) = s.parse::<f64>()
    {
        return Value::Float(f);
    }
    Value::String(s.to_string())
}
