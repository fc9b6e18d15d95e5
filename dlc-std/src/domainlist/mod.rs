//! Input converter reading a directory of domain list files.
//!
//! Every regular file becomes one entry named after its canonicalized
//! base name. `include:` directives are expanded across files before the
//! entries are added to the container.

mod parser;
mod resolve;

pub use parser::{parse_line, Outcome};
pub use resolve::{resolve, FileInfo};

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use dlc_interface::{
    async_trait, canonical_name, Action, Container, Entry, Error, InputConverter, Result,
};
use dlc_interface::registry::InputBuilder;
use indexmap::IndexMap;
use serde::Deserialize;
use tokio::fs;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainListConfig {
    data_dir: PathBuf,
    #[serde(default)]
    wanted_list: Vec<String>,
}

pub struct DomainListIn {
    action: Action,
    data_dir: PathBuf,
    want: HashSet<String>,
}

impl InputBuilder for DomainListIn {
    const NAME: &'static str = "domainlist";
    const DESCRIPTION: &'static str = "convert domain list files to other formats";
    type Config = DomainListConfig;
    type Converter = Self;

    fn build(action: Action, config: Self::Config) -> Result<Self> {
        if config.data_dir.as_os_str().is_empty() {
            return Err(Error::other("dataDir is required"));
        }
        let want = config
            .wanted_list
            .iter()
            .map(|name| canonical_name(name))
            .filter(|name| !name.is_empty())
            .collect();
        Ok(DomainListIn {
            action,
            data_dir: config.data_dir,
            want,
        })
    }
}

#[async_trait]
impl InputConverter for DomainListIn {
    fn type_name(&self) -> &'static str {
        Self::NAME
    }
    fn action(&self) -> Action {
        self.action
    }
    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    async fn input(&self, container: Container) -> Result<Container> {
        let mut files: IndexMap<String, FileInfo> = IndexMap::new();

        for entry in WalkDir::new(&self.data_dir).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = canonical_name(&entry.file_name().to_string_lossy());
            if !self.want.is_empty() && !self.want.contains(&name) {
                continue;
            }

            let info = process_file(entry.path(), &name)
                .await
                .map_err(|e| e.in_file(entry.path().display().to_string()))?;
            debug!("parsed {} ({} rules)", name, info.domains.len());
            files.insert(name, info);
        }

        resolve(&mut files)?;

        for (name, info) in files {
            let mut entry = Entry::new(&name);
            entry.add_domains(info.domains);
            container.add(entry)?;
        }

        Ok(container)
    }
}

async fn process_file(path: &Path, name: &str) -> Result<FileInfo> {
    let content = fs::read_to_string(path).await?;

    let mut info = FileInfo::new(name);
    for line in content.lines() {
        match parse_line(line).map_err(|e| e.in_rule(line.trim()))? {
            Outcome::Skip => {}
            Outcome::Rule(domain) => info.domains.push(domain),
            Outcome::Inclusion { target, filters } => {
                info.has_inclusion = true;
                info.inclusion_map
                    .entry(target)
                    .or_insert_with(Vec::new)
                    .extend(filters);
            }
        }
    }

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlc_interface::geosite::domain::Type;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn build(data_dir: &Path, wanted: &[&str]) -> DomainListIn {
        let config = DomainListConfig {
            data_dir: data_dir.to_path_buf(),
            wanted_list: wanted.iter().map(|s| s.to_string()).collect(),
        };
        DomainListIn::build(Action::Add, config).unwrap()
    }

    #[tokio::test]
    async fn test_directory_input() {
        let dir = TempDir::new().unwrap();
        std_fs::write(
            dir.path().join("base"),
            "full:Search.example.com @ads\ndomain:example.com\n# comment\n",
        )
        .unwrap();
        std_fs::write(
            dir.path().join("derived"),
            "keyword:cdn\ninclude:base@ads\n",
        )
        .unwrap();

        let converter = build(dir.path(), &[]);
        let container = converter.input(Container::new()).await.unwrap();

        assert_eq!(container.len(), 2);

        let base = container.get("BASE").unwrap();
        assert_eq!(base.domains().len(), 2);

        let derived = container.get("DERIVED").unwrap();
        let values: Vec<&str> = derived.domains().iter().map(|d| d.value.as_str()).collect();
        assert_eq!(values, vec!["cdn", "search.example.com"]);
        assert_eq!(derived.domains()[1].kind(), Type::Full);
    }

    #[tokio::test]
    async fn test_wanted_list_filters_files() {
        let dir = TempDir::new().unwrap();
        std_fs::write(dir.path().join("cn"), "domain:a.cn\n").unwrap();
        std_fs::write(dir.path().join("us"), "domain:a.us\n").unwrap();

        let converter = build(dir.path(), &["cn"]);
        let container = converter.input(Container::new()).await.unwrap();

        assert!(container.has("CN"));
        assert!(!container.has("US"));
    }

    #[tokio::test]
    async fn test_subdirectories_are_walked() {
        let dir = TempDir::new().unwrap();
        std_fs::create_dir(dir.path().join("sub")).unwrap();
        std_fs::write(dir.path().join("sub").join("nested"), "domain:a.com\n").unwrap();

        let converter = build(dir.path(), &[]);
        let container = converter.input(Container::new()).await.unwrap();
        assert!(container.has("NESTED"));
    }

    #[tokio::test]
    async fn test_parse_error_names_file_and_line() {
        let dir = TempDir::new().unwrap();
        std_fs::write(dir.path().join("bad"), "domain:a.com\nhost:b.com\n").unwrap();

        let converter = build(dir.path(), &[]);
        let err = converter.input(Container::new()).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("bad"), "{}", message);
        assert!(message.contains("host:b.com"), "{}", message);
    }

    #[tokio::test]
    async fn test_missing_data_dir_fails() {
        let config = DomainListConfig {
            data_dir: PathBuf::new(),
            wanted_list: Vec::new(),
        };
        assert!(DomainListIn::build(Action::Add, config).is_err());
    }

    #[tokio::test]
    async fn test_repeated_input_merges() {
        let dir = TempDir::new().unwrap();
        std_fs::write(dir.path().join("cn"), "domain:a.cn\n").unwrap();

        let converter = build(dir.path(), &[]);
        let container = converter.input(Container::new()).await.unwrap();
        let container = converter.input(container).await.unwrap();

        assert_eq!(container.get("CN").unwrap().domains().len(), 2);
    }
}
