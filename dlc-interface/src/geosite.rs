//! Wire types for the geosite binary format.
//!
//! Hand-written `prost` messages, byte-compatible with the
//! `routercommon.GeoSiteList` schema consumed by routing engines. Kept in
//! sync by the wire-format tests below rather than by code generation, so
//! the build needs no protoc.

/// One domain matching rule.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Domain {
    #[prost(enumeration = "domain::Type", tag = "1")]
    pub r#type: i32,
    #[prost(string, tag = "2")]
    pub value: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "3")]
    pub attribute: ::prost::alloc::vec::Vec<domain::Attribute>,
}

pub mod domain {
    #[derive(
        Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration,
    )]
    #[repr(i32)]
    pub enum Type {
        /// Exact hostname match.
        Full = 0,
        /// Suffix match on the registered domain.
        RootDomain = 1,
        /// Substring match.
        Keyword = 2,
        /// Regular expression match.
        Regex = 3,
    }

    /// A presence-only tag on a domain rule. `bool_value` is always `true`
    /// when the attribute is present.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Attribute {
        #[prost(string, tag = "1")]
        pub key: ::prost::alloc::string::String,
        #[prost(bool, tag = "2")]
        pub bool_value: bool,
    }
}

/// All rules belonging to one named list.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GeoSite {
    #[prost(string, tag = "1")]
    pub country_code: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "2")]
    pub domain: ::prost::alloc::vec::Vec<Domain>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GeoSiteList {
    #[prost(message, repeated, tag = "1")]
    pub entry: ::prost::alloc::vec::Vec<GeoSite>,
}

impl Domain {
    pub fn new(kind: domain::Type, value: impl Into<String>) -> Domain {
        Domain {
            r#type: kind as i32,
            value: value.into(),
            attribute: Vec::new(),
        }
    }

    pub fn kind(&self) -> domain::Type {
        domain::Type::try_from(self.r#type).unwrap_or(domain::Type::RootDomain)
    }

    pub fn add_attribute(&mut self, key: impl Into<String>) {
        self.attribute.push(domain::Attribute {
            key: key.into(),
            bool_value: true,
        });
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attribute.iter().any(|attr| attr.key == key)
    }
}

impl domain::Type {
    /// The type token used in the plaintext rule format.
    pub fn token(&self) -> &'static str {
        match self {
            domain::Type::Full => "full",
            domain::Type::RootDomain => "domain",
            domain::Type::Keyword => "keyword",
            domain::Type::Regex => "regexp",
        }
    }
}
