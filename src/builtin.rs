use dlc_interface::Registry;

/// Build a registry holding every converter shipped with this binary.
/// Constructed once by the entry point and passed by reference into the
/// pipeline.
pub fn builtin_registry() -> Registry {
    let mut registry = Registry::new();
    dlc_std::init(&mut registry);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = builtin_registry();
        assert!(registry.get_input("domainlist").is_ok());
        assert!(registry.get_output("text").is_ok());
        assert!(registry.get_output("v2rayGeoSite").is_ok());
    }
}
