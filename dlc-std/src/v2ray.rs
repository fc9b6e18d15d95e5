//! V2Ray geosite output converter.
//!
//! Serializes the selected entries into one length-delimited binary
//! aggregate (`geosite.dat`) and optionally renders a single entry into
//! the legacy base64-encoded GFWList subscription format.

use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
};

use chrono::{FixedOffset, Utc};
use dlc_interface::{
    async_trait, canonical_name,
    geosite::{domain::Type, GeoSite, GeoSiteList},
    registry::OutputBuilder,
    Action, Container, Entry, Error, OutputConverter, Result,
};
use prost::Message;
use serde::Deserialize;
use tokio::fs;
use tracing::{info, warn};

use crate::common::filter_and_sort;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeositeOutConfig {
    #[serde(default)]
    output_dir: PathBuf,
    #[serde(default)]
    output_name: String,
    #[serde(default)]
    wanted_list: Vec<String>,
    #[serde(default)]
    excluded_list: Vec<String>,
    /// `NAME@attr1@attr2,NAME2@attr` groups; rules carrying one of the
    /// named attributes are dropped from that entry's output.
    #[serde(default)]
    exclude_attrs: String,
    /// Entry name to additionally render in the GFWList format.
    #[serde(default)]
    gfwlist_output: String,
}

pub struct GeositeOut {
    action: Action,
    output_dir: PathBuf,
    output_name: String,
    want: Vec<String>,
    exclude: Vec<String>,
    exclude_attrs: HashMap<String, HashSet<String>>,
    gfwlist_output: Option<String>,
}

impl OutputBuilder for GeositeOut {
    const NAME: &'static str = "v2rayGeoSite";
    const DESCRIPTION: &'static str = "convert domain lists to V2Ray geosite format";
    type Config = GeositeOutConfig;
    type Converter = Self;

    fn build(action: Action, config: Self::Config) -> Result<Self> {
        let output_dir = if config.output_dir.as_os_str().is_empty() {
            PathBuf::from("./output")
        } else {
            config.output_dir
        };
        let output_name = if config.output_name.trim().is_empty() {
            "geosite.dat".to_string()
        } else {
            config.output_name
        };
        let gfwlist_output = Some(config.gfwlist_output)
            .filter(|name| !name.trim().is_empty());

        Ok(GeositeOut {
            action,
            output_dir,
            output_name,
            want: config.wanted_list,
            exclude: config.excluded_list,
            exclude_attrs: parse_exclude_attrs(&config.exclude_attrs),
            gfwlist_output,
        })
    }
}

fn parse_exclude_attrs(groups: &str) -> HashMap<String, HashSet<String>> {
    let mut map = HashMap::new();
    for group in groups.split(',') {
        let mut segments = group.trim().split('@');
        let name = canonical_name(segments.next().unwrap_or(""));
        if name.is_empty() {
            continue;
        }
        let attrs = segments
            .map(str::trim)
            .filter(|attr| !attr.is_empty())
            .map(str::to_string)
            .collect();
        map.insert(name, attrs);
    }
    map
}

#[async_trait]
impl OutputConverter for GeositeOut {
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

        // the whole buffer is built before the single write
        let list = self.to_site_list(container);
        let path = self.output_dir.join(&self.output_name);
        fs::write(&path, list.encode_to_vec())
            .await
            .map_err(|e| Error::from(e).in_file(path.display().to_string()))?;
        info!("generated {}", self.output_name);

        if let Some(name) = &self.gfwlist_output {
            self.write_gfwlist(container, name).await?;
        }

        Ok(())
    }
}

impl GeositeOut {
    fn to_site_list(&self, container: &Container) -> GeoSiteList {
        let mut list = GeoSiteList::default();
        for name in filter_and_sort(container, &self.want, &self.exclude) {
            match container.get(&name) {
                Some(entry) => list.entry.push(self.to_site(&entry)),
                None => warn!("entry {} not found", name),
            }
        }
        list
    }

    fn to_site(&self, entry: &Entry) -> GeoSite {
        let excluded = self.exclude_attrs.get(entry.name());

        let mut site = GeoSite {
            country_code: entry.name().to_lowercase(),
            domain: Vec::new(),
        };
        for domain in entry.domains() {
            if let Some(excluded) = excluded {
                if domain.attribute.iter().any(|attr| excluded.contains(&attr.key)) {
                    continue;
                }
            }
            site.domain.push(domain.clone());
        }
        site
    }

    async fn write_gfwlist(&self, container: &Container, list_name: &str) -> Result<()> {
        let entry = container.get(list_name).ok_or_else(|| {
            Error::NotFound(format!(
                "entry {} for gfwlist output",
                canonical_name(list_name)
            ))
        })?;

        let path = self.output_dir.join("gfwlist.txt");
        fs::write(&path, base64::encode(render_gfwlist(&entry)))
            .await
            .map_err(|e| Error::from(e).in_file(path.display().to_string()))?;
        info!("generated gfwlist.txt");
        Ok(())
    }
}

fn render_gfwlist(entry: &Entry) -> String {
    // GFWList consumers expect the modification time in Chinese civil time
    let now = Utc::now().with_timezone(&FixedOffset::east(8 * 3600));

    let mut body = String::with_capacity(entry.domains().len() * 32);
    body.push_str("[AutoProxy 0.2.9]\n");
    body.push_str(&format!(
        "! Last Modified: {}\n",
        now.format("%a, %d %b %Y %H:%M:%S %z")
    ));
    body.push_str("! Expires: 24h\n");
    body.push_str("! HomePage: https://github.com/dlconv/dlconv\n");
    body.push_str(
        "! GitHub URL: https://raw.githubusercontent.com/dlconv/dlconv/release/gfwlist.txt\n",
    );
    body.push_str("! jsdelivr URL: https://cdn.jsdelivr.net/gh/dlconv/dlconv@release/gfwlist.txt\n");
    body.push('\n');

    for domain in entry.domains() {
        let value = domain.value.trim();
        if value.is_empty() {
            continue;
        }
        match domain.kind() {
            Type::Full => {
                body.push_str(&format!("|http://{}\n", value));
                body.push_str(&format!("|https://{}\n", value));
            }
            Type::RootDomain => body.push_str(&format!("||{}\n", value)),
            Type::Keyword => body.push_str(&format!("{}\n", value)),
            Type::Regex => body.push_str(&format!("/{}/\n", value)),
        }
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlc_interface::geosite::Domain;
    use tempfile::TempDir;

    fn sample_container() -> Container {
        let container = Container::new();

        let mut cn = Entry::new("cn");
        cn.add_domain(Domain::new(Type::RootDomain, "example.cn"));
        let mut tagged = Domain::new(Type::Full, "ads.example.cn");
        tagged.add_attribute("ads");
        cn.add_domain(tagged);
        container.add(cn).unwrap();

        let mut gfw = Entry::new("gfw");
        gfw.add_domain(Domain::new(Type::Full, "blocked.example.com"));
        gfw.add_domain(Domain::new(Type::RootDomain, "blocked.org"));
        gfw.add_domain(Domain::new(Type::Keyword, "blocked"));
        gfw.add_domain(Domain::new(Type::Regex, "^block\\d+"));
        container.add(gfw).unwrap();

        container
    }

    fn build_config(dir: &TempDir) -> GeositeOutConfig {
        GeositeOutConfig {
            output_dir: dir.path().to_path_buf(),
            output_name: String::new(),
            wanted_list: Vec::new(),
            excluded_list: Vec::new(),
            exclude_attrs: String::new(),
            gfwlist_output: String::new(),
        }
    }

    #[test]
    fn test_parse_exclude_attrs() {
        let map = parse_exclude_attrs("cn@ads@cdn, geolocation-!cn@ads");
        assert_eq!(map.len(), 2);
        assert!(map["CN"].contains("ads"));
        assert!(map["CN"].contains("cdn"));
        assert!(map["GEOLOCATION-!CN"].contains("ads"));
        assert!(parse_exclude_attrs("").is_empty());
    }

    #[tokio::test]
    async fn test_dat_round_trip() {
        let dir = TempDir::new().unwrap();
        let converter = GeositeOut::build(Action::Output, build_config(&dir)).unwrap();
        converter.output(&sample_container()).await.unwrap();

        let bytes = std::fs::read(dir.path().join("geosite.dat")).unwrap();
        let list = GeoSiteList::decode(bytes.as_slice()).unwrap();

        // entries are sorted by name
        assert_eq!(list.entry.len(), 2);
        assert_eq!(list.entry[0].country_code, "cn");
        assert_eq!(list.entry[1].country_code, "gfw");
        assert_eq!(list.entry[0].domain.len(), 2);
        assert!(list.entry[0].domain[1].has_attribute("ads"));
    }

    #[tokio::test]
    async fn test_exclude_attrs_drops_rules() {
        let dir = TempDir::new().unwrap();
        let mut config = build_config(&dir);
        config.exclude_attrs = "cn@ads".to_string();
        let converter = GeositeOut::build(Action::Output, config).unwrap();
        converter.output(&sample_container()).await.unwrap();

        let bytes = std::fs::read(dir.path().join("geosite.dat")).unwrap();
        let list = GeoSiteList::decode(bytes.as_slice()).unwrap();

        let cn = &list.entry[0];
        assert_eq!(cn.country_code, "cn");
        assert_eq!(cn.domain.len(), 1);
        assert_eq!(cn.domain[0].value, "example.cn");
    }

    #[tokio::test]
    async fn test_gfwlist_rendering() {
        let dir = TempDir::new().unwrap();
        let mut config = build_config(&dir);
        config.gfwlist_output = "gfw".to_string();
        let converter = GeositeOut::build(Action::Output, config).unwrap();
        converter.output(&sample_container()).await.unwrap();

        let encoded = std::fs::read_to_string(dir.path().join("gfwlist.txt")).unwrap();
        let decoded = String::from_utf8(base64::decode(encoded.trim()).unwrap()).unwrap();

        let lines: Vec<&str> = decoded.lines().collect();
        assert_eq!(lines[0], "[AutoProxy 0.2.9]");
        assert!(lines[1].starts_with("! Last Modified: "));
        assert_eq!(lines[2], "! Expires: 24h");
        assert_eq!(lines[6], "");
        assert_eq!(
            &lines[7..],
            &[
                "|http://blocked.example.com",
                "|https://blocked.example.com",
                "||blocked.org",
                "blocked",
                "/^block\\d+/",
            ]
        );
    }

    #[tokio::test]
    async fn test_gfwlist_entry_must_exist() {
        let dir = TempDir::new().unwrap();
        let mut config = build_config(&dir);
        config.gfwlist_output = "absent".to_string();
        let converter = GeositeOut::build(Action::Output, config).unwrap();

        assert!(matches!(
            converter.output(&sample_container()).await,
            Err(Error::NotFound(_))
        ));
    }
}
