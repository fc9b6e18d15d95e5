//! Plaintext output converter, one `{entry}.txt` file per selected entry.

use std::path::PathBuf;

use dlc_interface::{
    async_trait, registry::OutputBuilder, Action, Container, Error, OutputConverter, Result,
};
use serde::Deserialize;
use tokio::fs;
use tracing::{info, warn};

use crate::common::filter_and_sort;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOutConfig {
    #[serde(default)]
    output_dir: PathBuf,
    #[serde(default)]
    wanted_list: Vec<String>,
    #[serde(default)]
    excluded_list: Vec<String>,
}

pub struct TextOut {
    action: Action,
    output_dir: PathBuf,
    output_ext: &'static str,
    want: Vec<String>,
    exclude: Vec<String>,
}

impl OutputBuilder for TextOut {
    const NAME: &'static str = "text";
    const DESCRIPTION: &'static str = "convert domain lists to plaintext files";
    type Config = TextOutConfig;
    type Converter = Self;

    fn build(action: Action, config: Self::Config) -> Result<Self> {
        let output_dir = if config.output_dir.as_os_str().is_empty() {
            PathBuf::from("./output")
        } else {
            config.output_dir
        };
        Ok(TextOut {
            action,
            output_dir,
            output_ext: ".txt",
            want: config.wanted_list,
            exclude: config.excluded_list,
        })
    }
}

#[async_trait]
impl OutputConverter for TextOut {
    fn type_name(&self) -> &'static str {
        Self::NAME
    }
    fn action(&self) -> Action {
        self.action
    }
    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    async fn output(&self, container: &Container) -> Result<()> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| Error::from(e).in_file(self.output_dir.display().to_string()))?;

        for name in filter_and_sort(container, &self.want, &self.exclude) {
            let entry = match container.get(&name) {
                Some(entry) => entry,
                None => {
                    warn!("entry {} not found", name);
                    continue;
                }
            };

            let file_name = format!("{}{}", entry.name().to_lowercase(), self.output_ext);
            let path = self.output_dir.join(&file_name);
            fs::write(&path, entry.to_text())
                .await
                .map_err(|e| Error::from(e).in_file(path.display().to_string()))?;
            info!("generated {}", file_name);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlc_interface::{
        geosite::{domain::Type, Domain},
        Entry,
    };
    use tempfile::TempDir;

    fn sample_container() -> Container {
        let container = Container::new();

        let mut cn = Entry::new("cn");
        cn.add_domain(Domain::new(Type::RootDomain, "example.cn"));
        let mut tagged = Domain::new(Type::Full, "ads.example.cn");
        tagged.add_attribute("ads");
        cn.add_domain(tagged);
        container.add(cn).unwrap();

        let mut us = Entry::new("us");
        us.add_domain(Domain::new(Type::Keyword, "example"));
        container.add(us).unwrap();

        container
    }

    fn build(dir: &TempDir, want: &[&str], exclude: &[&str]) -> TextOut {
        let config = TextOutConfig {
            output_dir: dir.path().to_path_buf(),
            wanted_list: want.iter().map(|s| s.to_string()).collect(),
            excluded_list: exclude.iter().map(|s| s.to_string()).collect(),
        };
        TextOut::build(Action::Output, config).unwrap()
    }

    #[tokio::test]
    async fn test_writes_one_file_per_entry() {
        let dir = TempDir::new().unwrap();
        let converter = build(&dir, &[], &[]);
        converter.output(&sample_container()).await.unwrap();

        let cn = std::fs::read_to_string(dir.path().join("cn.txt")).unwrap();
        assert_eq!(cn, "domain:example.cn\nfull:ads.example.cn:@ads\n");

        let us = std::fs::read_to_string(dir.path().join("us.txt")).unwrap();
        assert_eq!(us, "keyword:example\n");
    }

    #[tokio::test]
    async fn test_excluded_entry_is_not_written() {
        let dir = TempDir::new().unwrap();
        let converter = build(&dir, &[], &["cn"]);
        converter.output(&sample_container()).await.unwrap();

        assert!(!dir.path().join("cn.txt").exists());
        assert!(dir.path().join("us.txt").exists());
    }

    #[tokio::test]
    async fn test_wanted_entry_missing_from_container_is_skipped() {
        let dir = TempDir::new().unwrap();
        let converter = build(&dir, &["cn", "nonexistent"], &[]);
        converter.output(&sample_container()).await.unwrap();

        assert!(dir.path().join("cn.txt").exists());
        assert!(!dir.path().join("nonexistent.txt").exists());
    }
}
