use std::collections::HashSet;

use dlc_interface::{geosite::Domain, Error, Result};
use indexmap::IndexMap;

/// Per-file parse state, alive only while one input step expands its
/// inclusion directives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileInfo {
    pub name: String,
    pub has_inclusion: bool,
    /// target file name -> requested filters (`"@"` = all domains,
    /// `"@attr"` = only domains tagged `attr`). Directive order is kept.
    pub inclusion_map: IndexMap<String, Vec<String>>,
    pub domains: Vec<Domain>,
}

impl FileInfo {
    pub fn new(name: &str) -> FileInfo {
        FileInfo {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Expand every inclusion directive into the including file's domain list.
///
/// Files may include each other in any order, forward references
/// included, so this runs an iterative fixed point: each pass expands
/// every file whose targets are already fully expanded. A pass that
/// expands nothing while files remain means the remaining files form or
/// depend on a cycle.
pub fn resolve(files: &mut IndexMap<String, FileInfo>) -> Result<()> {
    for info in files.values() {
        for target in info.inclusion_map.keys() {
            if !files.contains_key(target) {
                return Err(Error::MissingInclusionTarget {
                    target: target.clone(),
                    referrer: info.name.clone(),
                });
            }
        }
    }

    let total = files.len();
    let mut processed: HashSet<String> = HashSet::with_capacity(total);

    while processed.len() < total {
        let mut progressed = false;

        let names: Vec<String> = files.keys().cloned().collect();
        for name in names {
            if processed.contains(&name) {
                continue;
            }

            let additions = {
                let info = match files.get(&name) {
                    Some(info) => info,
                    None => continue,
                };
                let ready = !info.has_inclusion
                    || info
                        .inclusion_map
                        .keys()
                        .all(|target| processed.contains(target));
                if !ready {
                    continue;
                }

                let mut additions: Vec<Domain> = Vec::new();
                for (target, filters) in &info.inclusion_map {
                    let dep = match files.get(target) {
                        Some(dep) => dep,
                        None => continue,
                    };
                    for filter in filters {
                        if filter == "@" {
                            additions.extend_from_slice(&dep.domains);
                        } else {
                            let attr = filter.trim_start_matches('@');
                            additions.extend(
                                dep.domains
                                    .iter()
                                    .filter(|domain| domain.has_attribute(attr))
                                    .cloned(),
                            );
                        }
                    }
                }
                additions
            };

            if let Some(info) = files.get_mut(&name) {
                info.domains.extend(additions);
            }
            processed.insert(name);
            progressed = true;
        }

        if !progressed {
            let mut unresolved: Vec<String> = files
                .keys()
                .filter(|name| !processed.contains(*name))
                .cloned()
                .collect();
            unresolved.sort();
            return Err(Error::CircularDependency(unresolved));
        }
    }

    Ok(())
}
