use toml::Table;

/// Deep-merge `overlay` on top of `base`.
/// Tables present on both sides are merged recursively; any other value from
/// `overlay` replaces the one in `base`. Keys already in `base` keep their
/// position; new keys are appended in `overlay` order.
pub fn deep_merge(mut base: Table, overlay: Table) -> Table {
    for (key, overlay_val) in overlay {
        let toml::Value::Table(overlay_tbl) = overlay_val else {
            base.insert(key, overlay_val);
            continue;
        };
        if let Some(toml::Value::Table(base_tbl)) = base.get_mut(&key) {
            let current = std::mem::take(base_tbl);
            *base_tbl = deep_merge(current, overlay_tbl);
            continue;
        }
        base.insert(key, toml::Value::Table(overlay_tbl));
    }
    base
}
